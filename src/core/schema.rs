//! Demo database schema
//!
//! `SCHEMA_DESCRIPTION` is the text handed to the SQL generator. It is not
//! checked against the live database.

pub const SCHEMA_DESCRIPTION: &str = "
Tables:
employees(id, name, department_id, email, salary)
departments(id, name)
orders(id, customer_name, employee_id, order_total, order_date)
products(id, name, price, embedding)

Relationships:
employees.department_id -> departments.id
orders.employee_id -> employees.id
";

/// Table DDL, in dependency order. Vector columns are packed f32 BLOBs.
pub const CREATE_TABLES_SQL: &[&str] = &[
    "
    CREATE TABLE IF NOT EXISTS departments (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    ",
    "
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        department_id INTEGER REFERENCES departments(id),
        email TEXT,
        salary REAL
    );
    ",
    "
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        customer_name TEXT,
        employee_id INTEGER REFERENCES employees(id),
        order_total REAL,
        order_date TEXT,
        customer_embedding BLOB
    );
    ",
    "
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        price REAL,
        embedding BLOB
    );
    CREATE INDEX IF NOT EXISTS idx_products_price ON products(price);
    ",
];

/// Small demo dataset for `init --seed`
pub const SEED_SQL: &str = "
INSERT INTO departments (id, name) VALUES
    (1, 'Sales'),
    (2, 'Engineering'),
    (3, 'Support');

INSERT INTO employees (id, name, department_id, email, salary) VALUES
    (1, 'Asha Rao', 1, 'asha@example.com', 62000),
    (2, 'Ben Okafor', 2, 'ben@example.com', 98000),
    (3, 'Chen Wei', 2, 'chen@example.com', 105000),
    (4, 'Dana Kim', 3, 'dana@example.com', 51000);

INSERT INTO products (id, name, price) VALUES
    (1, 'Wireless mouse', 25),
    (2, 'Mechanical keyboard', 89),
    (3, 'USB-C charging cable', 12),
    (4, '27 inch monitor', 329),
    (5, 'Noise cancelling headphones', 249),
    (6, 'Laptop stand', 45),
    (7, 'Gaming laptop', 1499),
    (8, 'Office chair', 210);

INSERT INTO orders (id, customer_name, employee_id, order_total, order_date) VALUES
    (1, 'Northwind Traders', 1, 1523.0, '2024-01-15'),
    (2, 'Contoso Ltd', 1, 89.0, '2024-02-03'),
    (3, 'Fabrikam Inc', 4, 374.0, '2024-02-20'),
    (4, 'Tailspin Toys', 1, 57.0, '2024-03-08');
";
