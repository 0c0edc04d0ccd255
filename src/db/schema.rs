use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Brands (vendors). Names are unique and immutable after creation.
        CREATE TABLE IF NOT EXISTS brands (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_brands_name ON brands(name);

        -- Products (licensable software within a brand)
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            brand_id TEXT NOT NULL REFERENCES brands(id),
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand_id);

        -- Customers (email is the identity key for license lookup)
        CREATE TABLE IF NOT EXISTS customers (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_customers_email ON customers(email);

        -- Licenses. Key uniqueness is scoped per product; seat occupancy is
        -- the count of activation rows, never a stored counter.
        CREATE TABLE IF NOT EXISTS licenses (
            id TEXT PRIMARY KEY,
            key TEXT NOT NULL,
            customer_id TEXT NOT NULL REFERENCES customers(id),
            product_id TEXT NOT NULL REFERENCES products(id),
            is_active INTEGER NOT NULL DEFAULT 1,
            max_seats INTEGER NOT NULL DEFAULT 1,
            expires_at INTEGER,
            created_at INTEGER NOT NULL,
            UNIQUE(product_id, key)
        );
        CREATE INDEX IF NOT EXISTS idx_licenses_customer ON licenses(customer_id);
        -- Note: UNIQUE(product_id, key) creates the implicit index used by validate

        -- Activations (one consumed seat per row)
        CREATE TABLE IF NOT EXISTS activations (
            id TEXT PRIMARY KEY,
            license_id TEXT NOT NULL REFERENCES licenses(id) ON DELETE CASCADE,
            machine_id TEXT NOT NULL,
            friendly_name TEXT,
            activated_at INTEGER NOT NULL,
            UNIQUE(license_id, machine_id)
        );
        CREATE INDEX IF NOT EXISTS idx_activations_license_time ON activations(license_id, activated_at DESC);
        "#,
    )?;
    Ok(())
}
