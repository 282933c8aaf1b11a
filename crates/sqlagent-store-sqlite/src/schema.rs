//! SQL schema for the demo database.
//!
//! Executed on every open. Safe to run against a file that already holds the
//! tables; existing rows are never touched.

/// Connection-level settings; these do not persist in the file.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS customers (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT    NOT NULL,
    email TEXT    NOT NULL UNIQUE,
    age   INTEGER NOT NULL CHECK (age > 0)
);

CREATE TABLE IF NOT EXISTS products (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT    NOT NULL UNIQUE,
    price REAL    NOT NULL CHECK (price >= 0),
    stock INTEGER NOT NULL CHECK (stock >= 0)
);

CREATE TABLE IF NOT EXISTS orders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL,
    product_id  INTEGER NOT NULL,
    quantity    INTEGER NOT NULL CHECK (quantity > 0),
    order_date  TEXT    NOT NULL,   -- YYYY-MM-DD
    FOREIGN KEY (customer_id) REFERENCES customers(id),
    FOREIGN KEY (product_id)  REFERENCES products(id)
);

CREATE TABLE IF NOT EXISTS suppliers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    contact_name  TEXT NOT NULL,
    contact_email TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS shipments (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id      INTEGER NOT NULL,
    shipment_date TEXT    NOT NULL,   -- YYYY-MM-DD
    delivery_date TEXT    NOT NULL,   -- YYYY-MM-DD, >= shipment_date
    supplier_id   INTEGER NOT NULL,
    FOREIGN KEY (order_id)    REFERENCES orders(id),
    FOREIGN KEY (supplier_id) REFERENCES suppliers(id)
);

PRAGMA user_version = 1;
";
