use std::sync::Arc;

use storefront_client::admin::{AdminConsole, AdminError};
use storefront_client::api::MockStorefrontApi;
use storefront_client::dto::products::{ImageUpload, ProductForm};
use storefront_client::dto::MessageResponse;
use storefront_client::error::ApiError;
use storefront_client::models::{OrderStatus, Product};

fn ok_message() -> Result<MessageResponse, ApiError> {
    Ok(MessageResponse {
        message: "OK".into(),
    })
}

fn product(id: i64, name: &str, stock: i64) -> Product {
    Product {
        id,
        name: name.into(),
        price: 60.0,
        original_price: Some(70.0),
        discount_percent: Some(14),
        unit: Some("1 Litre".into()),
        stock,
        category: None,
        image: Some("/uploads/milk.png".into()),
    }
}

#[tokio::test]
async fn bad_stock_input_never_reaches_the_backend() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_products()
        .times(1)
        .returning(|| Ok(vec![product(1, "Fresh Cow Milk", 10)]));
    mock.expect_update_stock().times(0);

    let mut console = AdminConsole::new(Arc::new(mock));
    console.load_products().await.unwrap();

    assert!(matches!(
        console.set_stock(1, "ten").await,
        Err(AdminError::InvalidStock)
    ));
    assert!(matches!(
        console.set_stock(1, "-1").await,
        Err(AdminError::NegativeStock)
    ));
}

#[tokio::test]
async fn stock_updates_save_and_reload() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_products()
        .times(1)
        .returning(|| Ok(vec![product(1, "Fresh Cow Milk", 10)]));
    mock.expect_update_stock()
        .withf(|id, stock| *id == 1 && *stock == 25)
        .times(1)
        .returning(|_, _| ok_message());
    mock.expect_fetch_products()
        .times(1)
        .returning(|| Ok(vec![product(1, "Fresh Cow Milk", 25)]));

    let mut console = AdminConsole::new(Arc::new(mock));
    console.load_products().await.unwrap();
    console.set_stock(1, " 25 ").await.unwrap();
    assert_eq!(console.products()[0].stock, 25);
}

#[tokio::test]
async fn product_create_sends_the_form_and_reloads() {
    let mut mock = MockStorefrontApi::new();
    mock.expect_create_product()
        .withf(|form| form.name == "Desi Ghee" && form.image.is_some())
        .times(1)
        .returning(|_| ok_message());
    mock.expect_fetch_products()
        .times(1)
        .returning(|| Ok(vec![product(2, "Desi Ghee", 50)]));

    let mut console = AdminConsole::new(Arc::new(mock));
    let form = ProductForm {
        name: "Desi Ghee".into(),
        price: 550.0,
        original_price: Some(600.0),
        unit: "500 gm".into(),
        stock: 50,
        category: None,
        image: Some(ImageUpload {
            file_name: "ghee.png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }),
    };
    console.create_product(form).await.unwrap();
    assert_eq!(console.products().len(), 1);
}

#[tokio::test]
async fn any_status_can_be_set_in_any_direction() {
    use chrono::NaiveDate;
    use storefront_client::models::OrderSummary;

    fn order(id: i64, status: OrderStatus) -> OrderSummary {
        OrderSummary {
            id,
            invoice_no: None,
            user_id: Some(1),
            total: 100.0,
            status,
            created_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    let mut mock = MockStorefrontApi::new();
    mock.expect_fetch_all_orders()
        .times(1)
        .returning(|| Ok(vec![order(1, OrderStatus::Delivered)]));
    // Backwards transition: Delivered -> Pending is allowed from here.
    mock.expect_update_order_status()
        .withf(|id, status| *id == 1 && *status == OrderStatus::Pending)
        .times(1)
        .returning(|_, _| ok_message());
    mock.expect_fetch_all_orders()
        .times(1)
        .returning(|| Ok(vec![order(1, OrderStatus::Pending)]));

    let mut console = AdminConsole::new(Arc::new(mock));
    console.load_orders().await.unwrap();
    console.set_status(1, OrderStatus::Pending).await.unwrap();
    assert_eq!(console.orders()[0].status, OrderStatus::Pending);
}
