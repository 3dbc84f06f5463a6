//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::insights::generate_insights;

    const USER: i64 = 1;
    const OTHER_USER: i64 = 2;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_wallet(db: &Database, user_id: i64, name: &str, balance: f64) -> i64 {
        db.create_wallet(
            user_id,
            &NewWallet {
                name: name.to_string(),
                wallet_type: WalletType::Bank,
                balance,
            },
        )
        .unwrap()
    }

    fn category_id(db: &Database, name: &str) -> i64 {
        db.list_categories(USER)
            .unwrap()
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .unwrap()
    }

    fn post(
        db: &Database,
        wallet_id: i64,
        category_id: i64,
        amount: f64,
        kind: TransactionType,
        date: NaiveDate,
    ) -> Result<i64> {
        db.create_transaction(
            USER,
            &NewTransaction {
                wallet_id,
                category_id,
                amount,
                kind,
                date,
                description: None,
            },
        )
    }

    fn balance(db: &Database, wallet_id: i64) -> f64 {
        db.get_wallet(USER, wallet_id).unwrap().unwrap().balance
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let snapshot = db.load_snapshot(USER).unwrap();
        assert!(snapshot.wallets.is_empty());
        assert!(snapshot.transactions.is_empty());
        assert!(snapshot.budgets.is_empty());
        assert_eq!(snapshot.user_id, USER);
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('wallets', 'categories', 'transactions', 'budgets')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_wallet_crud() {
        let db = Database::in_memory().unwrap();

        let id = new_wallet(&db, USER, "BCA", 250_000.0);
        let wallet = db.get_wallet(USER, id).unwrap().unwrap();
        assert_eq!(wallet.name, "BCA");
        assert_eq!(wallet.wallet_type, WalletType::Bank);
        assert_eq!(wallet.balance, 250_000.0);
        assert!(wallet.is_active);

        // Not visible to another user
        assert!(db.get_wallet(OTHER_USER, id).unwrap().is_none());

        db.set_wallet_active(USER, id, false).unwrap();
        assert!(!db.get_wallet(USER, id).unwrap().unwrap().is_active);
        assert!(matches!(
            db.set_wallet_active(OTHER_USER, id, true),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_wallet_name_required() {
        let db = Database::in_memory().unwrap();
        let result = db.create_wallet(
            USER,
            &NewWallet {
                name: "   ".to_string(),
                wallet_type: WalletType::Cash,
                balance: 0.0,
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_unknown_wallet_type_is_conversion_error() {
        let db = Database::in_memory().unwrap();
        new_wallet(&db, USER, "BCA", 100.0);
        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO wallets (user_id, name, wallet_type) VALUES (?, 'Coins', 'crypto')",
                [USER],
            )
            .unwrap();

        assert!(matches!(
            db.list_wallets(USER),
            Err(Error::Database(
                rusqlite::Error::FromSqlConversionFailure(3, _, _)
            ))
        ));
        assert!(matches!(
            db.load_snapshot(USER),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_list_reads_agree_with_snapshot() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let wallet = new_wallet(&db, USER, "BCA", 1_000_000.0);
        let food = category_id(&db, "Food & Drinks");
        post(&db, wallet, food, 25_000.0, TransactionType::Expense, date(2024, 3, 3)).unwrap();
        db.create_budget(
            USER,
            &NewBudget {
                category_id: food,
                wallet_id: None,
                allocated_amount: 500_000.0,
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 31),
            },
        )
        .unwrap();

        let snapshot = db.load_snapshot(USER).unwrap();
        assert_eq!(db.list_wallets(USER).unwrap().len(), snapshot.wallets.len());
        assert_eq!(
            db.list_categories(USER).unwrap().len(),
            snapshot.categories.len()
        );
        assert_eq!(db.list_transactions(USER).unwrap()[0].amount, 25_000.0);
        assert_eq!(db.list_budgets(USER).unwrap()[0].category_id, food);
        assert_eq!(snapshot.budgets.len(), 1);
    }

    #[test]
    fn test_seed_default_categories_is_idempotent() {
        let db = Database::in_memory().unwrap();

        let added = db.seed_default_categories().unwrap();
        assert_eq!(added, DEFAULT_CATEGORIES.len());
        assert_eq!(db.seed_default_categories().unwrap(), 0);
        assert_eq!(
            db.list_categories(USER).unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[test]
    fn test_categories_include_globals_and_own() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();

        db.create_category(&NewCategory {
            user_id: Some(USER),
            name: "Pets".to_string(),
            kind: TransactionType::Expense,
        })
        .unwrap();
        db.create_category(&NewCategory {
            user_id: Some(OTHER_USER),
            name: "Hobbies".to_string(),
            kind: TransactionType::Expense,
        })
        .unwrap();

        let names: Vec<String> = db
            .list_categories(USER)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert!(names.contains(&"Pets".to_string()));
        assert!(names.contains(&"Salary".to_string()));
        assert!(!names.contains(&"Hobbies".to_string()));
    }

    #[test]
    fn test_transaction_adjusts_wallet_balance() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let wallet = new_wallet(&db, USER, "BCA", 1_000_000.0);
        let food = category_id(&db, "Food & Drinks");
        let salary = category_id(&db, "Salary");

        let lunch = post(&db, wallet, food, 50_000.0, TransactionType::Expense, date(2024, 3, 2)).unwrap();
        assert_eq!(balance(&db, wallet), 950_000.0);

        post(&db, wallet, salary, 500_000.0, TransactionType::Income, date(2024, 3, 1)).unwrap();
        assert_eq!(balance(&db, wallet), 1_450_000.0);

        db.delete_transaction(USER, lunch).unwrap();
        assert_eq!(balance(&db, wallet), 1_500_000.0);
        assert_eq!(db.list_transactions(USER).unwrap().len(), 1);
    }

    #[test]
    fn test_transaction_rejected_without_side_effects() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let wallet = new_wallet(&db, USER, "BCA", 100.0);
        let foreign = new_wallet(&db, OTHER_USER, "Theirs", 100.0);
        let food = category_id(&db, "Food & Drinks");

        let result = post(&db, wallet, food, 0.0, TransactionType::Expense, date(2024, 3, 2));
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let result = post(&db, foreign, food, 10.0, TransactionType::Expense, date(2024, 3, 2));
        assert!(matches!(result, Err(Error::NotFound(_))));

        // Unknown category violates the foreign key; balance must not move
        let result = post(&db, wallet, 9_999, 10.0, TransactionType::Expense, date(2024, 3, 2));
        assert!(result.is_err());

        assert_eq!(balance(&db, wallet), 100.0);
        assert!(db.list_transactions(USER).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_transaction() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.delete_transaction(USER, 42),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_budget_crud() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let food = category_id(&db, "Food & Drinks");

        let id = db
            .create_budget(
                USER,
                &NewBudget {
                    category_id: food,
                    wallet_id: None,
                    allocated_amount: 1_000_000.0,
                    start_date: date(2024, 3, 1),
                    end_date: date(2024, 3, 31),
                },
            )
            .unwrap();

        let budget = db.get_budget(USER, id).unwrap().unwrap();
        assert_eq!(budget.category_id, food);
        assert_eq!(budget.start_date, date(2024, 3, 1));
        assert_eq!(budget.end_date, date(2024, 3, 31));
        assert!(db.get_budget(OTHER_USER, id).unwrap().is_none());
    }

    #[test]
    fn test_budget_window_validated() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let food = category_id(&db, "Food & Drinks");

        let result = db.create_budget(
            USER,
            &NewBudget {
                category_id: food,
                wallet_id: None,
                allocated_amount: 10.0,
                start_date: date(2024, 3, 31),
                end_date: date(2024, 3, 1),
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_snapshot_is_scoped_to_user() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let food = category_id(&db, "Food & Drinks");

        let mine = new_wallet(&db, USER, "Mine", 100_000.0);
        new_wallet(&db, OTHER_USER, "Theirs", 100_000.0);
        post(&db, mine, food, 10_000.0, TransactionType::Expense, date(2024, 3, 5)).unwrap();

        let snapshot = db.load_snapshot(USER).unwrap();
        assert_eq!(snapshot.wallets.len(), 1);
        assert_eq!(snapshot.wallets[0].balance, 90_000.0);
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions[0].date, date(2024, 3, 5));
        assert_eq!(snapshot.categories.len(), DEFAULT_CATEGORIES.len());

        let theirs = db.load_snapshot(OTHER_USER).unwrap();
        assert!(theirs.transactions.is_empty());
    }

    #[test]
    fn test_over_budget_end_to_end() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        let food = category_id(&db, "Food & Drinks");
        let wallet = new_wallet(&db, USER, "BCA", 5_000_000.0);

        db.create_budget(
            USER,
            &NewBudget {
                category_id: food,
                wallet_id: None,
                allocated_amount: 1_000_000.0,
                start_date: date(2024, 3, 1),
                end_date: date(2024, 3, 31),
            },
        )
        .unwrap();
        post(&db, wallet, food, 600_000.0, TransactionType::Expense, date(2024, 3, 3)).unwrap();
        post(&db, wallet, food, 500_000.0, TransactionType::Expense, date(2024, 3, 9)).unwrap();

        let snapshot = db.load_snapshot(USER).unwrap();
        let insights = generate_insights(&snapshot, date(2024, 3, 15), &InsightConfig::default());

        let over = insights
            .iter()
            .find(|i| i.kind.as_str() == "over_budget")
            .unwrap();
        assert!(over.message.contains("IDR 100,000"));
        assert_eq!(insights[0].kind.as_str(), "over_budget");
    }

    struct BrokenStore;

    impl LedgerStore for BrokenStore {
        fn list_wallets(&self, _user_id: i64) -> Result<Vec<Wallet>> {
            Ok(vec![])
        }

        fn list_categories(&self, _user_id: i64) -> Result<Vec<Category>> {
            Err(Error::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
                Some("connection lost".to_string()),
            )))
        }

        fn list_transactions(&self, _user_id: i64) -> Result<Vec<Transaction>> {
            Ok(vec![])
        }

        fn list_budgets(&self, _user_id: i64) -> Result<Vec<Budget>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_failed_read_is_data_unavailable() {
        let result = BrokenStore.load_snapshot(USER);
        match result {
            Err(Error::DataUnavailable(msg)) => assert!(msg.contains("connection lost")),
            other => panic!("expected DataUnavailable, got {:?}", other.map(|s| s.user_id)),
        }
    }
}
