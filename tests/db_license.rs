//! License ledger tests: issuance, key uniqueness, suspend/resume, lookup

mod common;

use common::*;

fn setup_refs(conn: &rusqlite::Connection) -> (Customer, Product) {
    let brand = create_test_brand(conn, "Acme");
    let product = create_test_product(conn, &brand.id, "Acme Studio");
    let customer = create_test_customer(conn, "jane@example.com");
    (customer, product)
}

// ============ Issuance ============

#[test]
fn test_issue_with_generated_key() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);

    let license = create_test_license(&mut conn, &customer.id, &product.id, 3);

    assert!(license.is_active);
    assert_eq!(license.max_seats, 3);
    // 24 random bytes -> 32 URL-safe base64 chars
    assert_eq!(license.key.len(), 32);
    assert!(license
        .key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn test_issue_with_supplied_key() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);

    let license = queries::create_license(
        &mut conn,
        &CreateLicense {
            customer_id: customer.id.clone(),
            product_id: product.id.clone(),
            key: Some("ABC-123".to_string()),
            max_seats: 1,
            expires_at: None,
        },
    )
    .expect("Issue failed");

    assert_eq!(license.key, "ABC-123");
}

#[test]
fn test_duplicate_key_same_product_rejected() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);

    let input = CreateLicense {
        customer_id: customer.id.clone(),
        product_id: product.id.clone(),
        key: Some("DUP-KEY".to_string()),
        max_seats: 1,
        expires_at: None,
    };
    queries::create_license(&mut conn, &input).expect("First issue failed");

    let result = queries::create_license(&mut conn, &input);
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn test_same_key_different_product_allowed() {
    // Key uniqueness is scoped per product
    let mut conn = setup_test_db();
    let (customer, product_a) = setup_refs(&conn);
    let brand = queries::list_brands(&conn, 1, 0).unwrap().remove(0);
    let product_b = create_test_product(&conn, &brand.id, "Acme Sketch");

    for product_id in [&product_a.id, &product_b.id] {
        queries::create_license(
            &mut conn,
            &CreateLicense {
                customer_id: customer.id.clone(),
                product_id: product_id.clone(),
                key: Some("SHARED-KEY".to_string()),
                max_seats: 1,
                expires_at: None,
            },
        )
        .expect("Issue failed");
    }
}

#[test]
fn test_issue_unknown_customer() {
    let mut conn = setup_test_db();
    let (_, product) = setup_refs(&conn);

    let result = queries::create_license(
        &mut conn,
        &CreateLicense {
            customer_id: "no-such-customer".to_string(),
            product_id: product.id.clone(),
            key: None,
            max_seats: 1,
            expires_at: None,
        },
    );

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_issue_unknown_product() {
    let mut conn = setup_test_db();
    let (customer, _) = setup_refs(&conn);

    let result = queries::create_license(
        &mut conn,
        &CreateLicense {
            customer_id: customer.id.clone(),
            product_id: "no-such-product".to_string(),
            key: None,
            max_seats: 1,
            expires_at: None,
        },
    );

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_max_seats_below_one_rejected() {
    let input = CreateLicense {
        customer_id: "c".to_string(),
        product_id: "p".to_string(),
        key: None,
        max_seats: 0,
        expires_at: None,
    };

    assert!(matches!(input.validate(), Err(AppError::BadRequest(_))));
}

// ============ Suspend / Resume ============

#[test]
fn test_suspend_and_resume() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    let license = create_test_license(&mut conn, &customer.id, &product.id, 2);

    let suspended = queries::set_license_active(&conn, &license.id, false).expect("Suspend failed");
    assert!(!suspended.is_active);

    let resumed = queries::set_license_active(&conn, &license.id, true).expect("Resume failed");
    assert!(resumed.is_active);
}

#[test]
fn test_suspend_is_idempotent() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    let license = create_test_license(&mut conn, &customer.id, &product.id, 2);

    queries::set_license_active(&conn, &license.id, false).expect("First suspend failed");
    let second = queries::set_license_active(&conn, &license.id, false).expect("Second suspend failed");

    assert!(!second.is_active);
}

#[test]
fn test_suspend_unknown_license() {
    let conn = setup_test_db();

    let result = queries::set_license_active(&conn, "no-such-license", false);

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_suspend_keeps_activations() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    let license = create_test_license(&mut conn, &customer.id, &product.id, 2);
    create_test_activation(&mut conn, &license.id, "m1");

    queries::set_license_active(&conn, &license.id, false).expect("Suspend failed");

    let count = queries::count_activations(&conn, &license.id).expect("Count failed");
    assert_eq!(count, 1);
}

// ============ Customer lookup join ============

#[test]
fn test_licenses_for_customer_with_seat_counts() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    let license = create_test_license(&mut conn, &customer.id, &product.id, 3);
    create_test_activation(&mut conn, &license.id, "m1");
    create_test_activation(&mut conn, &license.id, "m2");

    let results = queries::licenses_for_customer(&mut conn, &customer.id).expect("Join failed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].license.id, license.id);
    assert_eq!(results[0].active_seats, 2);
    assert_eq!(results[0].activations.len(), 2);
}

#[test]
fn test_licenses_for_customer_empty() {
    let mut conn = setup_test_db();
    let (customer, _) = setup_refs(&conn);

    let results = queries::licenses_for_customer(&mut conn, &customer.id).expect("Join failed");

    assert!(results.is_empty());
}

// ============ Validation snapshot ============

#[test]
fn test_snapshot_round_trip() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    queries::create_license(
        &mut conn,
        &CreateLicense {
            customer_id: customer.id.clone(),
            product_id: product.id.clone(),
            key: Some("ABC".to_string()),
            max_seats: 5,
            expires_at: None,
        },
    )
    .expect("Issue failed");

    let (license, active_seats) = queries::get_license_snapshot(&conn, &product.id, "ABC")
        .expect("Snapshot failed")
        .expect("License not found");

    assert_eq!(license.key, "ABC");
    assert_eq!(license.max_seats, 5);
    assert_eq!(active_seats, 0);
}

#[test]
fn test_snapshot_counts_seats() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    let license = create_test_license(&mut conn, &customer.id, &product.id, 3);
    create_test_activation(&mut conn, &license.id, "m1");

    let (_, active_seats) = queries::get_license_snapshot(&conn, &product.id, &license.key)
        .expect("Snapshot failed")
        .expect("License not found");

    assert_eq!(active_seats, 1);
}

#[test]
fn test_snapshot_requires_matching_product() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);
    let license = create_test_license(&mut conn, &customer.id, &product.id, 1);

    let miss = queries::get_license_snapshot(&conn, "other-product", &license.key)
        .expect("Snapshot failed");

    assert!(miss.is_none());
}

// ============ Expiry ============

#[test]
fn test_expired_helper() {
    let mut conn = setup_test_db();
    let (customer, product) = setup_refs(&conn);

    let license = queries::create_license(
        &mut conn,
        &CreateLicense {
            customer_id: customer.id.clone(),
            product_id: product.id.clone(),
            key: None,
            max_seats: 1,
            expires_at: Some(past_timestamp(1)),
        },
    )
    .expect("Issue failed");

    assert!(license.is_expired(future_timestamp(0)));
}
