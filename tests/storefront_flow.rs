use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use storefront_client::api::MockStorefrontApi;
use storefront_client::auth;
use storefront_client::cart::CartState;
use storefront_client::dto::auth::LoginResponse;
use storefront_client::dto::cart::CartSnapshot;
use storefront_client::dto::wishlist::WishlistAddResponse;
use storefront_client::dto::MessageResponse;
use storefront_client::error::ApiError;
use storefront_client::events::{AppEvent, EventBus, SessionChange, WishlistChange};
use storefront_client::guard::{authorize, Access, Route};
use storefront_client::models::{
    CartLine, OrderStatus, OrderSummary, UserProfile, WishlistEntry,
};
use storefront_client::orders::{OrderError, OrdersView};
use storefront_client::session::{FsVault, MemoryVault, SessionStore};
use storefront_client::wishlist::WishlistStore;

fn profile(role: &str) -> UserProfile {
    UserProfile {
        id: 1,
        name: "Asha".into(),
        email: "asha@example.com".into(),
        role: role.into(),
    }
}

fn ok_message() -> Result<MessageResponse, ApiError> {
    Ok(MessageResponse {
        message: "OK".into(),
    })
}

fn order(id: i64, status: OrderStatus) -> OrderSummary {
    OrderSummary {
        id,
        invoice_no: Some(format!("DF-20260801-{id:06}")),
        user_id: Some(1),
        total: 450.0,
        status,
        created_at: NaiveDate::from_ymd_opt(2026, 8, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}

fn wish(wishlist_id: i64, product_id: i64) -> WishlistEntry {
    WishlistEntry {
        wishlist_id,
        product_id,
        name: "Desi Ghee".into(),
        price: 550.0,
        stock: Some(50),
        image: None,
    }
}

#[tokio::test]
async fn login_opens_a_session_and_the_guard_follows_it() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_login()
        .withf(|req| req.email == "asha@example.com")
        .times(1)
        .returning(|_| {
            Ok(LoginResponse {
                access_token: "jwt-token".into(),
                user: profile("parent"),
            })
        });

    let bus = EventBus::new();
    let session = SessionStore::new(Box::new(MemoryVault::default()), bus.clone());
    let mut rx = bus.subscribe();

    // The email is normalized before it reaches the backend.
    let user = auth::login(&mock, &session, "  Asha@Example.com ", "secret@1", true)
        .await
        .unwrap();
    assert_eq!(user.role, "parent");
    assert_eq!(session.token().as_deref(), Some("jwt-token"));
    assert_eq!(
        rx.try_recv().unwrap(),
        AppEvent::SessionChanged(SessionChange::SignedIn)
    );

    let current = session.current().unwrap();
    assert_eq!(authorize(Route::Cart, Some(&current)), Access::Granted);
    assert_eq!(
        authorize(Route::Admin, Some(&current)),
        Access::Denied {
            redirect_to: Route::Login
        }
    );
}

#[test]
fn concurrent_expiries_produce_a_single_signout() {
    let bus = EventBus::new();
    let session = Arc::new(SessionStore::new(
        Box::new(MemoryVault::default()),
        bus.clone(),
    ));
    session.sign_in("jwt-token".into(), profile("parent"), true);

    let mut rx = bus.subscribe();
    thread::scope(|scope| {
        for _ in 0..8 {
            let session = Arc::clone(&session);
            scope.spawn(move || session.invalidate());
        }
    });

    assert_eq!(
        rx.try_recv().unwrap(),
        AppEvent::SessionChanged(SessionChange::Expired)
    );
    assert!(
        rx.try_recv().is_err(),
        "concurrent 401s must expire the session exactly once"
    );
    assert!(session.current().is_none());
}

#[test]
fn remembered_sessions_survive_a_restart_via_the_file_vault() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionStore::new(Box::new(FsVault::new(&path)), EventBus::new());
    first.sign_in("jwt-token".into(), profile("parent"), true);

    let second = SessionStore::new(Box::new(FsVault::new(&path)), EventBus::new());
    assert!(second.restore());
    assert_eq!(second.token().as_deref(), Some("jwt-token"));

    second.sign_out();
    let third = SessionStore::new(Box::new(FsVault::new(&path)), EventBus::new());
    assert!(!third.restore());
}

#[tokio::test]
async fn cancel_is_pending_only_and_updates_in_place() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_orders()
        .times(1)
        .returning(|| Ok(vec![order(1, OrderStatus::Pending), order(2, OrderStatus::Confirmed)]));
    mock.expect_cancel_order()
        .withf(|id| *id == 1)
        .times(1)
        .returning(|_| ok_message());

    let mut orders = OrdersView::new(Arc::new(mock));
    orders.load().await.unwrap();

    assert!(OrdersView::can_cancel(&orders.orders()[0]));
    assert!(!OrdersView::can_cancel(&orders.orders()[1]));

    // A confirmed order is refused locally, with no request.
    let err = orders.cancel(2).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::NotCancellable(OrderStatus::Confirmed)
    ));

    // The pending order cancels and flips in place, without a refetch.
    orders.cancel(1).await.unwrap();
    assert_eq!(orders.orders()[0].status, OrderStatus::Cancelled);
    assert_eq!(orders.orders()[1].status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn moving_a_wishlist_item_to_the_cart_keeps_the_entry() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_wishlist()
        .times(1)
        .returning(|| Ok(vec![wish(5, 50)]));

    let bus = EventBus::new();
    let mut wishlist = WishlistStore::new(Arc::new(mock), bus.clone());
    wishlist.load().await.unwrap();

    let mut cart_mock = MockStorefrontApi::new();
    cart_mock
        .expect_add_to_cart()
        .withf(|req| req.product_id == 50 && req.quantity == 1)
        .times(1)
        .returning(|_| ok_message());
    cart_mock.expect_fetch_cart().times(1).returning(|| {
        Ok(CartSnapshot {
            items: vec![CartLine {
                id: 1,
                product_id: 50,
                name: "Desi Ghee".into(),
                price: 550.0,
                quantity: 1,
                subtotal: 550.0,
                stock: Some(50),
                image: None,
            }],
            total: 550.0,
        })
    });
    let mut cart = CartState::new(Arc::new(cart_mock), bus);
    wishlist.move_to_cart(50, &mut cart).await.unwrap();

    assert_eq!(wishlist.count(), 1, "the wishlist entry must remain");
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn wishlist_removal_is_optimistic_and_broadcasts() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_wishlist()
        .times(1)
        .returning(|| Ok(vec![wish(5, 50), wish(6, 60)]));
    mock.expect_remove_from_wishlist()
        .withf(|id| *id == 5)
        .times(1)
        .returning(|_| ok_message());
    mock.expect_remove_from_wishlist()
        .withf(|id| *id == 6)
        .times(1)
        .returning(|_| {
            Err(ApiError::Rejected {
                status: 404,
                message: "Item not found".into(),
            })
        });

    let bus = EventBus::new();
    let mut wishlist = WishlistStore::new(Arc::new(mock), bus.clone());
    wishlist.load().await.unwrap();

    let mut rx = bus.subscribe();
    wishlist.remove(5).await.unwrap();
    assert_eq!(wishlist.count(), 1);
    assert_eq!(
        rx.try_recv().unwrap(),
        AppEvent::WishlistChanged(WishlistChange::ItemRemoved)
    );

    // A backend rejection surfaces, but the local removal stands.
    let err = wishlist.remove(6).await.unwrap_err();
    assert_eq!(err.backend_message(), Some("Item not found"));
    assert_eq!(wishlist.count(), 0);
}

#[tokio::test]
async fn wishlist_add_reloads_and_broadcasts() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_wishlist().times(1).returning(|| Ok(vec![]));
    mock.expect_add_to_wishlist()
        .withf(|id| *id == 50)
        .times(1)
        .returning(|_| {
            Ok(WishlistAddResponse {
                message: "Added to wishlist".into(),
                wishlist_id: 5,
                product_id: 50,
            })
        });
    mock.expect_fetch_wishlist()
        .times(1)
        .returning(|| Ok(vec![wish(5, 50)]));

    let bus = EventBus::new();
    let mut wishlist = WishlistStore::new(Arc::new(mock), bus.clone());
    wishlist.load().await.unwrap();

    let mut rx = bus.subscribe();
    wishlist.add(50).await.unwrap();
    assert_eq!(wishlist.count(), 1);
    assert_eq!(
        rx.try_recv().unwrap(),
        AppEvent::WishlistChanged(WishlistChange::ItemAdded)
    );
}
