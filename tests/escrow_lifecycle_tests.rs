//! Escrow lifecycle tests: conservation, races, and one-way transitions

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use socialblast_server::catalog::{CardStatus, CatalogError, CatalogService, SellCardRequest};
    use socialblast_server::escrow::{DisputeResolution, EscrowError, EscrowService};
    use socialblast_server::models::UserRole;
    use socialblast_server::orders::{OrderError, OrderOutcome, OrderService, OrderStatus};
    use socialblast_server::wallet::{WalletError, WalletService};

    /// Helper to create a test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/socialblast_test".to_string());

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database")
    }

    fn services(pool: &PgPool) -> (WalletService, CatalogService, OrderService, EscrowService) {
        let wallet = WalletService::new(pool.clone());
        let catalog = CatalogService::new(pool.clone());
        let orders = OrderService::new(pool.clone());
        let escrow = EscrowService::new(
            pool.clone(),
            wallet.clone(),
            catalog.clone(),
            orders.clone(),
        );
        (wallet, catalog, orders, escrow)
    }

    /// Insert a user with a starting available balance (cents)
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

    fn card_request(face_value: i64, asking_price: i64) -> SellCardRequest {
        SellCardRequest {
            card_type: "Amazon".to_string(),
            face_value,
            asking_price,
            currency: "USD".to_string(),
            code: "AMZN-TEST-CODE-0001".to_string(),
        }
    }

    /// Sum of available + escrow across a set of users
    async fn total_funds(pool: &PgPool, users: &[Uuid]) -> i64 {
        let mut total = 0i64;
        for user in users {
            let (available, escrow): (i64, i64) = sqlx::query_as(
                "SELECT available_balance, escrow_balance FROM users WHERE id = $1",
            )
            .bind(user)
            .fetch_one(pool)
            .await
            .expect("Failed to read balances");
            total += available + escrow;
        }
        total
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_reserve_moves_price_into_escrow() {
        let pool = setup_test_db().await;
        let (wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();

        let receipt = escrow.reserve_and_pay(buyer, card.id).await.unwrap();

        assert_eq!(receipt.item_status, CardStatus::Pending);
        assert_eq!(receipt.order.status, OrderStatus::Pending);
        assert_eq!(receipt.order.amount, 4_500);

        let balances = wallet.balances(buyer).await.unwrap();
        assert_eq!(balances.available_balance, 5_500);
        assert_eq!(balances.escrow_balance, 4_500);

        let card = catalog.get(card.id).await.unwrap();
        assert_eq!(card.status, CardStatus::Pending);
        assert_eq!(card.buyer_id, Some(buyer));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_insufficient_funds_leaves_state_untouched() {
        let pool = setup_test_db().await;
        let (wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(25_000, 20_000))
            .await
            .unwrap();

        let before = total_funds(&pool, &[buyer, seller]).await;

        let result = escrow.reserve_and_pay(buyer, card.id).await;
        assert!(matches!(
            result,
            Err(EscrowError::Wallet(WalletError::InsufficientFunds { .. }))
        ));

        // No mutation has occurred: balances and card state are unchanged
        assert_eq!(total_funds(&pool, &[buyer, seller]).await, before);
        let balances = wallet.balances(buyer).await.unwrap();
        assert_eq!(balances.available_balance, 10_000);
        assert_eq!(balances.escrow_balance, 0);

        let card = catalog.get(card.id).await.unwrap();
        assert_eq!(card.status, CardStatus::Available);
        assert_eq!(card.buyer_id, None);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_concurrent_reservations_have_one_winner() {
        let pool = setup_test_db().await;
        let (_wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer_a = create_user(&pool, 10_000).await;
        let buyer_b = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();

        let escrow_a = escrow.clone();
        let escrow_b = escrow.clone();
        let card_id = card.id;

        let (ra, rb) = tokio::join!(
            escrow_a.reserve_and_pay(buyer_a, card_id),
            escrow_b.reserve_and_pay(buyer_b, card_id),
        );

        let a_won = ra.is_ok();
        let winners = [ra.is_ok(), rb.is_ok()].iter().filter(|&&w| w).count();
        assert_eq!(winners, 1, "exactly one reservation must win");

        let loser = if a_won { rb } else { ra };
        assert!(matches!(
            loser,
            Err(EscrowError::Catalog(CatalogError::ItemNotAvailable(_)))
        ));

        // The loser keeps every cent
        let loser_id = if a_won { buyer_b } else { buyer_a };
        let (available, escrow_balance): (i64, i64) = sqlx::query_as(
            "SELECT available_balance, escrow_balance FROM users WHERE id = $1",
        )
        .bind(loser_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(available, 10_000);
        assert_eq!(escrow_balance, 0);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_settlement_pays_seller_and_reveals_code() {
        let pool = setup_test_db().await;
        let (wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();

        let funds_before = total_funds(&pool, &[buyer, seller]).await;

        let receipt = escrow.reserve_and_pay(buyer, card.id).await.unwrap();

        // Code is hidden while the purchase is pending
        assert!(matches!(
            catalog.reveal_code(card.id, buyer).await,
            Err(CatalogError::CodeNotVisible)
        ));

        let settled = escrow
            .confirm_settlement(seller, receipt.order.id)
            .await
            .unwrap();
        assert_eq!(settled.item_status, CardStatus::Sold);
        assert_eq!(settled.order.status, OrderStatus::Completed);

        let buyer_balances = wallet.balances(buyer).await.unwrap();
        assert_eq!(buyer_balances.available_balance, 5_500);
        assert_eq!(buyer_balances.escrow_balance, 0);

        let seller_balances = wallet.balances(seller).await.unwrap();
        assert_eq!(seller_balances.available_balance, 4_500);

        // Conservation: settlement only moved funds between parties
        assert_eq!(total_funds(&pool, &[buyer, seller]).await, funds_before);

        // Buyer can now read the code; nobody else can
        let code = catalog.reveal_code(card.id, buyer).await.unwrap();
        assert_eq!(code, "AMZN-TEST-CODE-0001");
        assert!(catalog.reveal_code(card.id, seller).await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_settlement_is_idempotent_rejecting() {
        let pool = setup_test_db().await;
        let (wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();
        let receipt = escrow.reserve_and_pay(buyer, card.id).await.unwrap();

        escrow
            .confirm_settlement(seller, receipt.order.id)
            .await
            .unwrap();

        // Second confirmation must not double-pay
        let second = escrow.confirm_settlement(seller, receipt.order.id).await;
        assert!(matches!(
            second,
            Err(EscrowError::Order(OrderError::AlreadyFinalized(_)))
        ));

        let seller_balances = wallet.balances(seller).await.unwrap();
        assert_eq!(seller_balances.available_balance, 4_500);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_finalize_twice_returns_already_finalized() {
        let pool = setup_test_db().await;
        let (_wallet, _catalog, orders, _escrow) = services(&pool);

        let user = create_user(&pool, 0).await;

        let mut tx = pool.begin().await.unwrap();
        let order = orders
            .create(
                &mut tx,
                user,
                socialblast_server::orders::OrderKind::Smm,
                1_000,
                serde_json::json!({}),
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        orders
            .finalize(&mut tx, order.id, OrderOutcome::Completed)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let second = orders.finalize(&mut tx, order.id, OrderOutcome::Failed).await;
        assert!(matches!(second, Err(OrderError::AlreadyFinalized(_))));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_dispute_freezes_escrow_until_refund() {
        let pool = setup_test_db().await;
        let (wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();
        let receipt = escrow.reserve_and_pay(buyer, card.id).await.unwrap();

        let disputed = escrow.flag_dispute(buyer, receipt.order.id).await.unwrap();
        assert_eq!(disputed.item_status, CardStatus::Disputed);
        assert_eq!(disputed.order.status, OrderStatus::Pending);

        // Funds stay frozen in escrow
        let balances = wallet.balances(buyer).await.unwrap();
        assert_eq!(balances.escrow_balance, 4_500);

        // Seller cannot settle a disputed card
        assert!(matches!(
            escrow.confirm_settlement(seller, receipt.order.id).await,
            Err(EscrowError::Catalog(CatalogError::InvalidTransition { .. }))
        ));

        // Admin refund returns the escrow and fails the order
        let resolved = escrow
            .resolve_dispute(receipt.order.id, DisputeResolution::Refund)
            .await
            .unwrap();
        assert_eq!(resolved.order.status, OrderStatus::Failed);

        let balances = wallet.balances(buyer).await.unwrap();
        assert_eq!(balances.available_balance, 10_000);
        assert_eq!(balances.escrow_balance, 0);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_dispute_release_pays_seller() {
        let pool = setup_test_db().await;
        let (wallet, catalog, _orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();
        let receipt = escrow.reserve_and_pay(buyer, card.id).await.unwrap();
        escrow.flag_dispute(seller, receipt.order.id).await.unwrap();

        let resolved = escrow
            .resolve_dispute(receipt.order.id, DisputeResolution::Release)
            .await
            .unwrap();
        assert_eq!(resolved.item_status, CardStatus::Sold);
        assert_eq!(resolved.order.status, OrderStatus::Completed);

        let seller_balances = wallet.balances(seller).await.unwrap();
        assert_eq!(seller_balances.available_balance, 4_500);

        let code = catalog.reveal_code(card.id, buyer).await.unwrap();
        assert_eq!(code, "AMZN-TEST-CODE-0001");
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_expired_reservation_is_rolled_back() {
        let pool = setup_test_db().await;
        let (wallet, catalog, orders, escrow) = services(&pool);

        let seller = create_user(&pool, 0).await;
        let buyer = create_user(&pool, 10_000).await;

        let card = catalog
            .create_listing(seller, card_request(5_000, 4_500))
            .await
            .unwrap();
        let receipt = escrow.reserve_and_pay(buyer, card.id).await.unwrap();

        // Backdate the reservation past the TTL
        sqlx::query("UPDATE gift_cards SET reserved_at = NOW() - INTERVAL '100 hours' WHERE id = $1")
            .bind(card.id)
            .execute(&pool)
            .await
            .unwrap();

        let expired = escrow.expire_reservations(72).await.unwrap();
        assert!(expired.contains(&card.id));

        let balances = wallet.balances(buyer).await.unwrap();
        assert_eq!(balances.available_balance, 10_000);
        assert_eq!(balances.escrow_balance, 0);

        let card = catalog.get(card.id).await.unwrap();
        assert_eq!(card.status, CardStatus::Available);
        assert_eq!(card.buyer_id, None);

        let order = orders.get(receipt.order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Failed);
    }

    #[test]
    fn test_card_status_serialization() {
        for status in [
            CardStatus::Available,
            CardStatus::Pending,
            CardStatus::Sold,
            CardStatus::Disputed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert!(!json.is_empty());
        }
        assert_eq!(
            serde_json::to_string(&CardStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
