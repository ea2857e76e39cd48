use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_creates_pool_and_applies_migrations() {
    let test_db = common::TestDb::new("test_creates_pool.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let test_db = common::TestDb::new("test_foreign_keys.db");
    let mut conn = test_db.pool().get().unwrap();

    let result = conn.batch_execute(
        "INSERT INTO users (hub_id, email, name, user_type, branch_id, is_active) \
         VALUES (1, 'a@example.com', 'A', 'employee', 999, 1);",
    );
    assert!(result.is_err());
}
