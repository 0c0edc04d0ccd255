//! Registry store tests: brands, products, customers

mod common;

use common::*;

// ============ Brand Tests ============

#[test]
fn test_create_brand() {
    let conn = setup_test_db();

    let brand = create_test_brand(&conn, "Acme");

    assert!(!brand.id.is_empty());
    assert_eq!(brand.name, "Acme");
    assert!(brand.created_at > 0);
}

#[test]
fn test_duplicate_brand_name_rejected() {
    let conn = setup_test_db();
    create_test_brand(&conn, "Acme");

    let result = queries::create_brand(
        &conn,
        &CreateBrand {
            name: "Acme".to_string(),
            email: "other@acme.example".to_string(),
        },
    );

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn test_list_brands_insertion_order() {
    let conn = setup_test_db();
    create_test_brand(&conn, "First");
    create_test_brand(&conn, "Second");
    create_test_brand(&conn, "Third");

    let brands = queries::list_brands(&conn, 100, 0).expect("List failed");

    let names: Vec<&str> = brands.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn test_list_brands_pagination() {
    let conn = setup_test_db();
    for i in 0..5 {
        create_test_brand(&conn, &format!("Brand{}", i));
    }

    let page = queries::list_brands(&conn, 2, 2).expect("List failed");

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "Brand2");
    assert_eq!(page[1].name, "Brand3");
}

// ============ Product Tests ============

#[test]
fn test_create_product() {
    let conn = setup_test_db();
    let brand = create_test_brand(&conn, "Acme");

    let product = create_test_product(&conn, &brand.id, "Acme Studio");

    assert_eq!(product.brand_id, brand.id);
    assert_eq!(product.name, "Acme Studio");
}

#[test]
fn test_create_product_unknown_brand() {
    let conn = setup_test_db();

    let result = queries::create_product(
        &conn,
        &CreateProduct {
            name: "Orphan".to_string(),
            brand_id: "no-such-brand".to_string(),
        },
    );

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ============ Customer Tests ============

#[test]
fn test_create_customer() {
    let conn = setup_test_db();

    let customer = create_test_customer(&conn, "jane@example.com");

    assert_eq!(customer.email, "jane@example.com");
}

#[test]
fn test_duplicate_customer_email_rejected() {
    let conn = setup_test_db();
    create_test_customer(&conn, "jane@example.com");

    let result = queries::create_customer(
        &conn,
        &CreateCustomer {
            email: "jane@example.com".to_string(),
        },
    );

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn test_get_customer_by_email() {
    let conn = setup_test_db();
    let created = create_test_customer(&conn, "jane@example.com");

    let fetched = queries::get_customer_by_email(&conn, "jane@example.com")
        .expect("Query failed")
        .expect("Customer not found");

    assert_eq!(fetched.id, created.id);
}

#[test]
fn test_get_customer_by_email_absent() {
    let conn = setup_test_db();

    let result = queries::get_customer_by_email(&conn, "ghost@example.com").expect("Query failed");

    assert!(result.is_none());
}

// ============ Input Validation ============

#[test]
fn test_create_brand_input_validation() {
    assert!(CreateBrand {
        name: "  ".to_string(),
        email: "a@b.example".to_string(),
    }
    .validate()
    .is_err());

    assert!(CreateBrand {
        name: "Acme".to_string(),
        email: "not-an-email".to_string(),
    }
    .validate()
    .is_err());

    assert!(CreateBrand {
        name: "Acme".to_string(),
        email: "contact@acme.example".to_string(),
    }
    .validate()
    .is_ok());
}

#[test]
fn test_create_customer_input_validation() {
    assert!(CreateCustomer {
        email: "user@@example.com".to_string(),
    }
    .validate()
    .is_err());

    assert!(CreateCustomer {
        email: "user@example.com".to_string(),
    }
    .validate()
    .is_ok());
}
