use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::keygen::generate_license_key;
use crate::models::*;

use super::from_row::{
    query_all, query_one, ACTIVATION_COLS, BRAND_COLS, CUSTOMER_COLS, LICENSE_COLS, PRODUCT_COLS,
};

/// Collision-retry bound for auto-generated keys. A collision on a 192-bit
/// token is astronomically unlikely; hitting the bound means something is
/// wrong with the entropy source, so we escalate instead of looping.
const MAX_KEY_ATTEMPTS: u32 = 5;

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether the error is a UNIQUE constraint violation. Uniqueness checks are
/// delegated to the store so check-then-insert is atomic.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ============ Brands ============

pub fn create_brand(conn: &Connection, input: &CreateBrand) -> Result<Brand> {
    let id = gen_id();
    let created_at = now();

    let inserted = conn.execute(
        "INSERT INTO brands (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, &input.name, &input.email, created_at],
    );

    match inserted {
        Ok(_) => Ok(Brand {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            created_at,
        }),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Brand name '{}' is already registered",
            input.name
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn get_brand_by_id(conn: &Connection, id: &str) -> Result<Option<Brand>> {
    query_one(
        conn,
        &format!("SELECT {} FROM brands WHERE id = ?1", BRAND_COLS),
        &[&id],
    )
}

/// List brands in insertion order.
pub fn list_brands(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<Brand>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM brands ORDER BY rowid LIMIT ?1 OFFSET ?2",
            BRAND_COLS
        ),
        &[&limit, &offset],
    )
}

// ============ Products ============

pub fn create_product(conn: &Connection, input: &CreateProduct) -> Result<Product> {
    if get_brand_by_id(conn, &input.brand_id)?.is_none() {
        return Err(AppError::NotFound("Brand not found".into()));
    }

    let id = gen_id();
    let created_at = now();

    conn.execute(
        "INSERT INTO products (id, name, brand_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, &input.name, &input.brand_id, created_at],
    )?;

    Ok(Product {
        id,
        name: input.name.clone(),
        brand_id: input.brand_id.clone(),
        created_at,
    })
}

pub fn get_product_by_id(conn: &Connection, id: &str) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLS),
        &[&id],
    )
}

pub fn list_products(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<Product>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM products ORDER BY rowid LIMIT ?1 OFFSET ?2",
            PRODUCT_COLS
        ),
        &[&limit, &offset],
    )
}

// ============ Customers ============

pub fn create_customer(conn: &Connection, input: &CreateCustomer) -> Result<Customer> {
    let id = gen_id();
    let created_at = now();

    let inserted = conn.execute(
        "INSERT INTO customers (id, email, created_at) VALUES (?1, ?2, ?3)",
        params![&id, &input.email, created_at],
    );

    match inserted {
        Ok(_) => Ok(Customer {
            id,
            email: input.email.clone(),
            created_at,
        }),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Email '{}' is already registered",
            input.email
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn get_customer_by_email(conn: &Connection, email: &str) -> Result<Option<Customer>> {
    query_one(
        conn,
        &format!("SELECT {} FROM customers WHERE email = ?1", CUSTOMER_COLS),
        &[&email],
    )
}

pub fn list_customers(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<Customer>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM customers ORDER BY rowid LIMIT ?1 OFFSET ?2",
            CUSTOMER_COLS
        ),
        &[&limit, &offset],
    )
}

// ============ Licenses ============

/// Issue a license. Created active.
///
/// When no key is supplied, a random URL-safe key is generated; uniqueness is
/// enforced by `UNIQUE(product_id, key)` with a bounded retry loop rather
/// than trusted to the generator. The reference checks and the insert run in
/// a single IMMEDIATE transaction so a concurrent issue with the same key
/// cannot slip between check and insert.
pub fn create_license(conn: &mut Connection, input: &CreateLicense) -> Result<License> {
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    let customer_exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)",
        params![&input.customer_id],
        |row| row.get(0),
    )?;
    if !customer_exists {
        return Err(AppError::NotFound("Customer not found".into()));
    }

    let product_exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1)",
        params![&input.product_id],
        |row| row.get(0),
    )?;
    if !product_exists {
        return Err(AppError::NotFound("Product not found".into()));
    }

    let id = gen_id();
    let created_at = now();

    let insert = |key: &str| {
        tx.execute(
            "INSERT INTO licenses (id, key, customer_id, product_id, is_active, max_seats, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7)",
            params![
                &id,
                key,
                &input.customer_id,
                &input.product_id,
                input.max_seats,
                input.expires_at,
                created_at
            ],
        )
    };

    let key = match input.key {
        Some(ref key) => match insert(key) {
            Ok(_) => key.clone(),
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(
                    "License key already in use for this product".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        },
        None => {
            let mut generated = None;
            for _ in 0..MAX_KEY_ATTEMPTS {
                let candidate = generate_license_key();
                match insert(&candidate) {
                    Ok(_) => {
                        generated = Some(candidate);
                        break;
                    }
                    Err(e) if is_unique_violation(&e) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            generated.ok_or_else(|| {
                AppError::KeyGeneration(format!(
                    "Could not generate a unique key in {} attempts",
                    MAX_KEY_ATTEMPTS
                ))
            })?
        }
    };

    tx.commit()?;

    Ok(License {
        id,
        key,
        customer_id: input.customer_id.clone(),
        product_id: input.product_id.clone(),
        is_active: true,
        max_seats: input.max_seats,
        expires_at: input.expires_at,
        created_at,
    })
}

pub fn get_license_by_id(conn: &Connection, id: &str) -> Result<Option<License>> {
    query_one(
        conn,
        &format!("SELECT {} FROM licenses WHERE id = ?1", LICENSE_COLS),
        &[&id],
    )
}

/// Flip the active flag and return the updated license. Idempotent - setting
/// the current state again is a no-op. Activations are untouched either way.
pub fn set_license_active(conn: &Connection, id: &str, is_active: bool) -> Result<License> {
    let updated = conn.execute(
        "UPDATE licenses SET is_active = ?1 WHERE id = ?2",
        params![is_active as i32, id],
    )?;
    if updated == 0 {
        return Err(AppError::NotFound("License not found".into()));
    }
    get_license_by_id(conn, id)?
        .ok_or_else(|| AppError::Internal("License vanished after update".into()))
}

/// All licenses for a customer, each joined with its activations and the
/// computed live seat count. The reads run in one deferred transaction so
/// the license rows and their activation lists are a consistent snapshot
/// under concurrent suspends and activations.
pub fn licenses_for_customer(
    conn: &mut Connection,
    customer_id: &str,
) -> Result<Vec<LicenseWithActivations>> {
    let tx = conn.transaction()?;

    let licenses: Vec<License> = query_all(
        &tx,
        &format!(
            "SELECT {} FROM licenses WHERE customer_id = ?1 ORDER BY rowid",
            LICENSE_COLS
        ),
        &[&customer_id],
    )?;

    let results = licenses
        .into_iter()
        .map(|license| {
            let activations = list_activations_for_license(&tx, &license.id)?;
            let active_seats = activations.len() as i64;
            Ok(LicenseWithActivations {
                license,
                activations,
                active_seats,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tx.commit()?;
    Ok(results)
}

/// Read a license by its compound validate key together with its live seat
/// count. A single statement, so the pair is a consistent snapshot - the
/// count can never reflect an activation the license row does not.
pub fn get_license_snapshot(
    conn: &Connection,
    product_id: &str,
    key: &str,
) -> Result<Option<(License, i64)>> {
    use super::from_row::FromRow;
    use rusqlite::OptionalExtension;

    conn.query_row(
        &format!(
            "SELECT {}, (SELECT COUNT(*) FROM activations WHERE activations.license_id = licenses.id)
             FROM licenses WHERE product_id = ?1 AND key = ?2",
            LICENSE_COLS
        ),
        params![product_id, key],
        |row| {
            let license = License::from_row(row)?;
            let active_seats: i64 = row.get(8)?;
            Ok((license, active_seats))
        },
    )
    .optional()
    .map_err(Into::into)
}

// ============ Activations ============

/// Result of attempting to activate a machine against a license
pub enum ActivationOutcome {
    /// Returned an existing activation (machine already holds a seat)
    Existing(Activation),
    /// Created a new activation, consuming one seat
    Created(Activation),
}

impl ActivationOutcome {
    pub fn into_activation(self) -> Activation {
        match self {
            ActivationOutcome::Existing(a) | ActivationOutcome::Created(a) => a,
        }
    }
}

/// Atomically activate a machine, enforcing the seat cap.
///
/// Runs in an IMMEDIATE transaction: the write lock is taken up front, so the
/// sequence {read seat count, compare to max_seats, insert activation} is
/// exclusive per database. Two concurrent activations cannot both observe
/// `count = max_seats - 1` and both succeed.
///
/// # PostgreSQL migration note
/// When migrating, add `FOR UPDATE` to the license SELECT to get the same
/// row-level locking; SQLite's IMMEDIATE transaction provides it implicitly
/// by serializing writers.
pub fn activate_machine(
    conn: &mut Connection,
    input: &CreateActivation,
) -> Result<ActivationOutcome> {
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    let license: License = query_one(
        &tx,
        &format!("SELECT {} FROM licenses WHERE id = ?1", LICENSE_COLS),
        &[&input.license_id],
    )?
    .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    if !license.is_active {
        return Err(AppError::Suspended(
            "License is suspended and admits no new activations".into(),
        ));
    }

    if license.is_expired(now()) {
        return Err(AppError::BadRequest("License has expired".into()));
    }

    // Idempotent re-activation: same machine keeps its seat, no double count
    let existing: Option<Activation> = query_one(
        &tx,
        &format!(
            "SELECT {} FROM activations WHERE license_id = ?1 AND machine_id = ?2",
            ACTIVATION_COLS
        ),
        &[&input.license_id, &input.machine_id],
    )?;

    if let Some(activation) = existing {
        tx.commit()?;
        return Ok(ActivationOutcome::Existing(activation));
    }

    let seats_used: i64 = tx.query_row(
        "SELECT COUNT(*) FROM activations WHERE license_id = ?1",
        params![&input.license_id],
        |row| row.get(0),
    )?;

    if seats_used >= license.max_seats as i64 {
        return Err(AppError::SeatLimit(format!(
            "All {} seats are in use. Deactivate a machine first.",
            license.max_seats
        )));
    }

    let id = gen_id();
    let activated_at = now();

    tx.execute(
        "INSERT INTO activations (id, license_id, machine_id, friendly_name, activated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            &id,
            &input.license_id,
            &input.machine_id,
            &input.friendly_name,
            activated_at
        ],
    )?;

    tx.commit()?;

    Ok(ActivationOutcome::Created(Activation {
        id,
        license_id: input.license_id.clone(),
        machine_id: input.machine_id.clone(),
        friendly_name: input.friendly_name.clone(),
        activated_at,
    }))
}

pub fn get_activation_by_id(conn: &Connection, id: &str) -> Result<Option<Activation>> {
    query_one(
        conn,
        &format!("SELECT {} FROM activations WHERE id = ?1", ACTIVATION_COLS),
        &[&id],
    )
}

/// Remove an activation, freeing exactly one seat. A second call on the same
/// id reports `NotFound`; the boundary decides how to present that.
pub fn delete_activation(conn: &Connection, id: &str) -> Result<()> {
    let deleted = conn.execute("DELETE FROM activations WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(AppError::NotFound("Activation not found".into()));
    }
    Ok(())
}

pub fn count_activations(conn: &Connection, license_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM activations WHERE license_id = ?1",
        params![license_id],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

pub fn list_activations_for_license(
    conn: &Connection,
    license_id: &str,
) -> Result<Vec<Activation>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM activations WHERE license_id = ?1 ORDER BY activated_at DESC, rowid DESC",
            ACTIVATION_COLS
        ),
        &[&license_id],
    )
}
