use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{DatePolicy, Engine, EngineError, EntryDate, Money};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(value: &str) -> EntryDate {
    EntryDate::parse(value, DatePolicy::Shape).unwrap()
}

fn money(value: &str) -> Money {
    Money::parse_positive(value).unwrap()
}

async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn registering_twice_keeps_a_single_user() {
    let (engine, db) = engine_with_db().await;

    let first = engine
        .get_or_create_user(42, Some("Ada"), None)
        .await
        .unwrap();
    assert!(first.is_new());
    assert_eq!(first.user().first_name.as_deref(), Some("Ada"));

    let second = engine.get_or_create_user(42, None, None).await.unwrap();
    assert!(!second.is_new());
    assert_eq!(second.user(), first.user());

    assert_eq!(count_rows(&db, "users").await, 1);
    assert_eq!(count_rows(&db, "user_profiles").await, 1);
}

#[tokio::test]
async fn lookup_miss_is_not_memoized() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.user_by_telegram_id(7).await.unwrap().is_none());
    engine.get_or_create_user(7, None, None).await.unwrap();

    let user = engine.user_by_telegram_id(7).await.unwrap();
    assert_eq!(user.map(|u| u.telegram_id), Some(7));
}

#[tokio::test]
async fn lookup_works_without_cache() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .user_cache_capacity(0)
        .build()
        .await
        .unwrap();

    engine.get_or_create_user(9, None, None).await.unwrap();
    engine.forget_user(9).await;
    assert!(engine.user_by_telegram_id(9).await.unwrap().is_some());
}

#[tokio::test]
async fn category_names_are_unique_and_case_sensitive() {
    let (engine, _db) = engine_with_db().await;

    let food = engine.create_category("Food").await.unwrap();
    assert_eq!(food.name, "Food");

    let err = engine.create_category("Food").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Food".to_string()));

    let lower = engine.create_category("food").await.unwrap();
    assert_ne!(lower.id, food.id);

    let names: Vec<String> = engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food".to_string(), "food".to_string()]);

    assert_eq!(
        engine.category_by_name("Food").await.unwrap(),
        Some(food)
    );
    assert!(engine.category_by_name("FOOD").await.unwrap().is_none());
    assert!(engine.category_by_name(" Food").await.unwrap().is_none());
}

#[tokio::test]
async fn total_balance_without_entries_is_zero() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.get_or_create_user(1, None, None).await.unwrap();

    let balance = engine.total_balance(user.user().id).await.unwrap();
    assert_eq!(balance.income.to_string(), "0.00");
    assert_eq!(balance.expense.to_string(), "0.00");
    assert_eq!(balance.total().to_string(), "0.00");
}

#[tokio::test]
async fn total_balance_sums_incomes_and_expenses() {
    let (engine, _db) = engine_with_db().await;
    let user_id = engine
        .get_or_create_user(1, None, None)
        .await
        .unwrap()
        .user()
        .id;
    let other_id = engine
        .get_or_create_user(2, None, None)
        .await
        .unwrap()
        .user()
        .id;
    let food = engine.create_category("Food").await.unwrap();

    engine
        .add_income(user_id, money("100.00"), &date("2024-01-05"), "salary")
        .await
        .unwrap();
    engine
        .add_income(user_id, money("50"), &date("2024-02-05"), "gift")
        .await
        .unwrap();
    let expense = engine
        .add_expense(user_id, food.id, money("30.00"), &date("2024-01-10"), "pizza")
        .await
        .unwrap();
    assert_eq!(expense.category_id, food.id);
    assert_eq!(expense.date.as_str(), "2024-01-10");

    // Another user's entries never leak into the report.
    engine
        .add_income(other_id, money("999"), &date("2024-01-05"), "other")
        .await
        .unwrap();

    let balance = engine.total_balance(user_id).await.unwrap();
    assert_eq!(balance.income.to_string(), "150.00");
    assert_eq!(balance.expense.to_string(), "30.00");
    assert_eq!(balance.total().to_string(), "120.00");
}

#[tokio::test]
async fn period_balance_window_is_inclusive() {
    let (engine, _db) = engine_with_db().await;
    let user_id = engine
        .get_or_create_user(1, None, None)
        .await
        .unwrap()
        .user()
        .id;
    let food = engine.create_category("Food").await.unwrap();

    for (amount, day) in [
        ("10", "2023-12-31"),
        ("20", "2024-01-01"),
        ("30", "2024-01-15"),
        ("40", "2024-01-31"),
        ("50", "2024-02-01"),
    ] {
        engine
            .add_income(user_id, money(amount), &date(day), "income")
            .await
            .unwrap();
    }
    engine
        .add_expense(user_id, food.id, money("5"), &date("2024-01-31"), "in")
        .await
        .unwrap();
    engine
        .add_expense(user_id, food.id, money("7"), &date("2024-02-01"), "out")
        .await
        .unwrap();

    let balance = engine
        .period_balance(user_id, &date("2024-01-01"), &date("2024-01-31"))
        .await
        .unwrap();
    assert_eq!(balance.income, money("90"));
    assert_eq!(balance.expense, money("5"));
    assert_eq!(balance.total(), money("85"));

    let empty = engine
        .period_balance(user_id, &date("2020-01-01"), &date("2020-12-31"))
        .await
        .unwrap();
    assert_eq!(empty.total(), Money::ZERO);
}

#[tokio::test]
async fn entries_require_existing_references() {
    let (engine, db) = engine_with_db().await;
    let user_id = engine
        .get_or_create_user(1, None, None)
        .await
        .unwrap()
        .user()
        .id;

    let err = engine
        .add_income(user_id + 100, money("1"), &date("2024-01-01"), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .add_expense(user_id, 12345, money("1"), &date("2024-01-01"), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .add_income(user_id, Money::ZERO, &date("2024-01-01"), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert_eq!(count_rows(&db, "incomes").await, 0);
    assert_eq!(count_rows(&db, "expenses").await, 0);
}

#[tokio::test]
async fn fractional_amounts_are_summed_exactly() {
    let (engine, _db) = engine_with_db().await;
    let user_id = engine
        .get_or_create_user(1, None, None)
        .await
        .unwrap()
        .user()
        .id;

    let income = engine
        .add_income(user_id, money("12.345"), &date("2024-01-01"), "a")
        .await
        .unwrap();
    assert_eq!(income.amount.to_string(), "12.345");
    for _ in 0..10 {
        engine
            .add_income(user_id, money("0.1"), &date("2024-01-02"), "b")
            .await
            .unwrap();
    }

    let balance = engine.total_balance(user_id).await.unwrap();
    assert_eq!(balance.income, money("13.345"));
    assert_eq!(balance.income.rounded(), "13.35");
}

#[tokio::test]
async fn unreadable_stored_amount_is_a_database_error() {
    let (engine, db) = engine_with_db().await;
    let user_id = engine
        .get_or_create_user(1, None, None)
        .await
        .unwrap()
        .user()
        .id;
    db.execute_unprepared(&format!(
        "INSERT INTO incomes (user_id, amount, date, description) \
         VALUES ({user_id}, 'abc', '2024-01-01', 'broken')"
    ))
    .await
    .unwrap();

    let err = engine.total_balance(user_id).await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
}
