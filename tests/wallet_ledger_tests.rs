//! Wallet ledger tests: deposits, audit entries, and purchase flows

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use socialblast_server::models::UserRole;
    use socialblast_server::orders::{OrderService, OrderStatus};
    use socialblast_server::smm::{PlaceSmmOrderRequest, SmmError, SmmService};
    use socialblast_server::wallet::{TransactionKind, WalletError, WalletService};

    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/socialblast_test".to_string());

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database")
    }

    async fn create_user(pool: &PgPool, balance: i64) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name, role, available_balance)
            VALUES ($1, $2, 'test-hash', 'Test User', $3, $4)
            "#,
        )
        .bind(id)
        .bind(format!("{}@test.example", id))
        .bind(UserRole::User)
        .bind(balance)
        .execute(pool)
        .await
        .expect("Failed to insert test user");
        id
    }

    async fn create_offering(pool: &PgPool, price_per_1000: i64) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO smm_services
                (id, platform, service_type, name, min_quantity, max_quantity, price_per_1000)
            VALUES ($1, 'instagram', 'followers', 'IG Followers', 100, 100000, $2)
            "#,
        )
        .bind(id)
        .bind(price_per_1000)
        .execute(pool)
        .await
        .expect("Failed to insert offering");
        id
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_deposit_credits_and_records() {
        let pool = setup_test_db().await;
        let wallet = WalletService::new(pool.clone());

        let user = create_user(&pool, 0).await;

        let balances = wallet.deposit(user, 5_000).await.unwrap();
        assert_eq!(balances.available_balance, 5_000);
        assert_eq!(balances.escrow_balance, 0);

        // The ledger entry landed in the same unit
        let history = wallet.history(user, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 5_000);
        assert_eq!(history[0].kind, TransactionKind::Deposit);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_smm_order_debits_and_stays_pending() {
        let pool = setup_test_db().await;
        let wallet = WalletService::new(pool.clone());
        let orders = OrderService::new(pool.clone());
        let smm = SmmService::new(pool.clone(), wallet.clone(), orders.clone());

        let user = create_user(&pool, 10_000).await;
        let offering = create_offering(&pool, 250).await;

        let order = smm
            .place_order(
                user,
                PlaceSmmOrderRequest {
                    service_id: offering,
                    quantity: 2_000,
                    link: "https://instagram.com/someone".to_string(),
                },
            )
            .await
            .unwrap();

        // 250 cents per 1000 x 2000 = 500 cents
        assert_eq!(order.amount, 500);
        assert_eq!(order.status, OrderStatus::Pending);

        let balances = wallet.balances(user).await.unwrap();
        assert_eq!(balances.available_balance, 9_500);

        let history = wallet.history(user, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Purchase);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_smm_order_rejects_out_of_range_quantity() {
        let pool = setup_test_db().await;
        let wallet = WalletService::new(pool.clone());
        let orders = OrderService::new(pool.clone());
        let smm = SmmService::new(pool.clone(), wallet.clone(), orders.clone());

        let user = create_user(&pool, 10_000).await;
        let offering = create_offering(&pool, 250).await;

        let result = smm
            .place_order(
                user,
                PlaceSmmOrderRequest {
                    service_id: offering,
                    quantity: 10, // below min_quantity = 100
                    link: "https://instagram.com/someone".to_string(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(SmmError::QuantityOutOfRange { got: 10, .. })
        ));

        // Nothing was charged
        let balances = wallet.balances(user).await.unwrap();
        assert_eq!(balances.available_balance, 10_000);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_insufficient_balance_blocks_smm_order() {
        let pool = setup_test_db().await;
        let wallet = WalletService::new(pool.clone());
        let orders = OrderService::new(pool.clone());
        let smm = SmmService::new(pool.clone(), wallet.clone(), orders.clone());

        let user = create_user(&pool, 100).await;
        let offering = create_offering(&pool, 250).await;

        let result = smm
            .place_order(
                user,
                PlaceSmmOrderRequest {
                    service_id: offering,
                    quantity: 10_000, // costs 2500 cents
                    link: "https://instagram.com/someone".to_string(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(SmmError::Wallet(WalletError::InsufficientFunds { .. }))
        ));

        let history = wallet.history(user, 10).await.unwrap();
        assert!(history.is_empty(), "failed order must not leave ledger rows");
    }
}
