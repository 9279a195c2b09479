//! Launch catalog and demo account data.
//!
//! The catalog is static reference data. Demo orders and sample
//! notifications are written into an empty store the first time the
//! corresponding service reads it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use grooveo_core::catalog::{Catalog, Dimensions, Product};
use grooveo_core::notification::Notification;
use grooveo_core::order::{Order, OrderItem, ShippingAddress};
use grooveo_core::{Money, NotificationId, NotificationKind, OrderId, OrderStatus, ProductId};

struct ProductSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: i64,
    compare_at: Option<i64>,
    category: &'static str,
    material: &'static str,
    tags: &'static [&'static str],
    dimensions: (f64, f64, f64),
    weight: u32,
    stock: u32,
}

const PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        id: "eco-mailer-1",
        name: "Biodegradable Kraft Mailers",
        description: "Eco-friendly shipping mailers made from 100% recycled kraft paper. Perfect for e-commerce businesses looking to reduce their environmental impact.",
        price: 1078,
        compare_at: Some(1327),
        category: "Mailers & Envelopes",
        material: "Recycled Paper",
        tags: &["Biodegradable", "Recyclable", "Plastic-Free"],
        dimensions: (25.0, 35.0, 1.0),
        weight: 50,
        stock: 25,
    },
    ProductSeed {
        id: "eco-box-1",
        name: "Corrugated Shipping Boxes",
        description: "Sturdy corrugated boxes made from 100% recycled materials. These boxes provide excellent protection while being environmentally responsible.",
        price: 2074,
        compare_at: None,
        category: "Boxes & Containers",
        material: "Recycled Cardboard",
        tags: &["Recyclable", "FSC Certified", "Plastic-Free"],
        dimensions: (30.0, 20.0, 15.0),
        weight: 200,
        stock: 3,
    },
    ProductSeed {
        id: "eco-tape-1",
        name: "Paper Packaging Tape",
        description: "Water-activated paper tape that's 100% recyclable and biodegradable. Strong adhesion without the environmental impact of plastic tape.",
        price: 746,
        compare_at: Some(912),
        category: "Tape & Adhesives",
        material: "Kraft Paper",
        tags: &["Biodegradable", "Recyclable", "Plastic-Free"],
        dimensions: (5.0, 50.0, 5.0),
        weight: 100,
        stock: 0,
    },
    ProductSeed {
        id: "eco-filler-1",
        name: "Compostable Packing Peanuts",
        description: "Plant-based packing peanuts that dissolve in water and are fully compostable. Perfect for protecting fragile items during shipping.",
        price: 1244,
        compare_at: None,
        category: "Void Fillers",
        material: "Cornstarch",
        tags: &["Compostable", "Biodegradable", "Plastic-Free"],
        dimensions: (20.0, 30.0, 20.0),
        weight: 150,
        stock: 42,
    },
    ProductSeed {
        id: "eco-wrap-1",
        name: "Honeycomb Paper Wrap",
        description: "Expandable paper wrap that provides excellent cushioning and protection for your products. A sustainable alternative to bubble wrap.",
        price: 1576,
        compare_at: None,
        category: "Void Fillers",
        material: "Recycled Paper",
        tags: &["Recyclable", "Plastic-Free", "FSC Certified"],
        dimensions: (30.0, 5.0, 30.0),
        weight: 120,
        stock: 4,
    },
    ProductSeed {
        id: "eco-bag-1",
        name: "Compostable Poly Mailers",
        description: "Plant-based poly mailers that are fully compostable and biodegradable. Waterproof and durable for secure shipping.",
        price: 1327,
        compare_at: Some(1659),
        category: "Mailers & Envelopes",
        material: "Bioplastic",
        tags: &["Compostable", "Biodegradable", "Waterproof"],
        dimensions: (25.0, 35.0, 0.5),
        weight: 30,
        stock: 0,
    },
    ProductSeed {
        id: "eco-tissue-1",
        name: "Recycled Tissue Paper",
        description: "Soft tissue paper made from 100% recycled materials. Perfect for wrapping products and creating an eco-friendly unboxing experience.",
        price: 580,
        compare_at: None,
        category: "Void Fillers",
        material: "Recycled Paper",
        tags: &["Recyclable", "FSC Certified", "Plastic-Free"],
        dimensions: (50.0, 70.0, 0.1),
        weight: 80,
        stock: 15,
    },
    ProductSeed {
        id: "eco-box-2",
        name: "Kraft Gift Boxes",
        description: "Elegant kraft gift boxes made from recycled materials. Perfect for retail packaging or subscription boxes.",
        price: 1659,
        compare_at: None,
        category: "Boxes & Containers",
        material: "Recycled Cardboard",
        tags: &["Recyclable", "FSC Certified", "Plastic-Free"],
        dimensions: (20.0, 10.0, 5.0),
        weight: 150,
        stock: 2,
    },
    ProductSeed {
        id: "eco-label-1",
        name: "Compostable Shipping Labels",
        description: "Eco-friendly shipping labels made from plant-based materials. Compatible with standard thermal printers.",
        price: 829,
        compare_at: None,
        category: "Labels & Stickers",
        material: "Bioplastic",
        tags: &["Compostable", "Biodegradable"],
        dimensions: (10.0, 15.0, 0.1),
        weight: 20,
        stock: 8,
    },
];

/// The launch catalog, featured products first.
#[must_use]
pub fn catalog() -> Catalog {
    let products = PRODUCTS
        .iter()
        .map(|seed| {
            let (width_cm, height_cm, depth_cm) = seed.dimensions;
            Product {
                id: ProductId::new(seed.id),
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                price: Money::from_minor(seed.price),
                compare_at_price: seed.compare_at.map(Money::from_minor),
                category: seed.category.to_string(),
                material: Some(seed.material.to_string()),
                tags: seed.tags.iter().map(ToString::to_string).collect(),
                dimensions: Some(Dimensions {
                    width_cm,
                    height_cm,
                    depth_cm,
                }),
                weight_grams: Some(seed.weight),
                stock_count: seed.stock,
            }
        })
        .collect();
    Catalog::new(products)
}

fn at(date: (i32, u32, u32), hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn day(date: (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default()
}

fn item(id: &str, name: &str, price: i64, quantity: u32) -> OrderItem {
    OrderItem {
        product_id: ProductId::new(id),
        name: name.to_string(),
        price: Money::from_minor(price),
        quantity,
    }
}

fn demo_address() -> ShippingAddress {
    ShippingAddress {
        name: "John Doe".to_string(),
        street: "123 Eco Street".to_string(),
        city: "Green City".to_string(),
        state: "Nature State".to_string(),
        postal_code: "12345".to_string(),
        country: "USA".to_string(),
    }
}

/// Order history shown on a fresh account, newest first.
#[must_use]
pub fn demo_orders() -> Vec<Order> {
    const PAYMENT_CONFIRMED: &str = "Payment confirmed, order processing";

    let mut delivered = Order::place(
        OrderId::new("ORD-12345"),
        vec![
            item("eco-mailer-1", "Biodegradable Kraft Mailers", 1299, 2),
            item("eco-box-1", "Corrugated Shipping Boxes", 2499, 1),
            item("eco-tape-1", "Paper Packaging Tape", 899, 3),
        ],
        demo_address(),
        Money::from_minor(7897),
        at((2025, 5, 5), 9, 15),
    )
    .with_tracking("UPS", "1Z999AA10123456784")
    .with_estimated_delivery(day((2025, 5, 10)));
    delivered.record_status(
        OrderStatus::Processing,
        PAYMENT_CONFIRMED,
        None,
        at((2025, 5, 5), 14, 30),
    );
    delivered.record_status(
        OrderStatus::Shipped,
        "Order shipped",
        Some("Distribution Center, Portland, OR".to_string()),
        at((2025, 5, 6), 10, 45),
    );
    delivered.record_status(
        OrderStatus::OutForDelivery,
        "Out for delivery",
        Some("Local Delivery Facility, Green City".to_string()),
        at((2025, 5, 9), 8, 20),
    );
    delivered.record_status(
        OrderStatus::Delivered,
        "Delivered",
        Some("Front Door, Green City".to_string()),
        at((2025, 5, 9), 14, 15),
    );

    let mut shipped = Order::place(
        OrderId::new("ORD-12346"),
        vec![
            item("eco-filler-1", "Compostable Packing Peanuts", 1499, 1),
            item("eco-wrap-1", "Honeycomb Paper Wrap", 1899, 1),
        ],
        demo_address(),
        Money::from_minor(4598),
        at((2025, 4, 22), 11, 30),
    )
    .with_tracking("FedEx", "1Z999AA10123456785")
    .with_estimated_delivery(day((2025, 5, 12)));
    shipped.record_status(
        OrderStatus::Processing,
        PAYMENT_CONFIRMED,
        None,
        at((2025, 4, 22), 15, 45),
    );
    shipped.record_status(
        OrderStatus::Shipped,
        "Order shipped",
        Some("Distribution Center, Seattle, WA".to_string()),
        at((2025, 4, 23), 9, 20),
    );

    let mut processing = Order::place(
        OrderId::new("ORD-12347"),
        vec![
            item("eco-tissue-1", "Recycled Tissue Paper", 699, 2),
            item("eco-label-1", "Compostable Shipping Labels", 999, 1),
            item("eco-bag-1", "Compostable Poly Mailers", 1599, 1),
        ],
        demo_address(),
        Money::from_minor(3297),
        at((2025, 5, 8), 10, 15),
    )
    .with_estimated_delivery(day((2025, 5, 15)));
    processing.record_status(
        OrderStatus::Processing,
        PAYMENT_CONFIRMED,
        None,
        at((2025, 5, 8), 13, 30),
    );

    vec![processing, delivered, shipped]
}

/// Welcome notifications for a fresh account, newest first.
#[must_use]
pub fn sample_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        Notification {
            id: NotificationId::new("notif-1"),
            kind: NotificationKind::OrderStatus,
            title: "Order Shipped".to_string(),
            message: "Your order #ORD-12345 has been shipped and is on its way!".to_string(),
            timestamp: now - Duration::minutes(30),
            read: false,
            action_url: Some("/account/orders/ORD-12345".to_string()),
            order_id: Some(OrderId::new("ORD-12345")),
            order_status: Some(OrderStatus::Shipped),
        },
        Notification {
            id: NotificationId::new("notif-2"),
            kind: NotificationKind::Promotion,
            title: "Weekend Sale".to_string(),
            message: "Enjoy 15% off all eco-friendly packaging this weekend!".to_string(),
            timestamp: now - Duration::hours(2),
            read: true,
            action_url: Some("/products".to_string()),
            order_id: None,
            order_status: None,
        },
        Notification {
            id: NotificationId::new("notif-3"),
            kind: NotificationKind::Account,
            title: "Welcome to Grooveo".to_string(),
            message: "Thank you for creating an account. Start shopping for sustainable packaging!"
                .to_string(),
            timestamp: now - Duration::days(1),
            read: true,
            action_url: Some("/products".to_string()),
            order_id: None,
            order_status: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use grooveo_core::catalog::StockLevel;

    use super::*;

    #[test]
    fn test_catalog_contents() {
        let catalog = catalog();
        assert_eq!(catalog.products().len(), 9);
        assert_eq!(catalog.categories().len(), 5);
        let tape = catalog.get(&ProductId::new("eco-tape-1"));
        assert_eq!(tape.map(Product::stock_level), Some(StockLevel::OutOfStock));
    }

    #[test]
    fn test_demo_orders_follow_history() {
        let orders = demo_orders();
        assert_eq!(orders.len(), 3);
        for order in &orders {
            let last = order.latest_update().map(|u| u.status);
            assert_eq!(last, Some(order.status()));
            let first = order.status_updates().first().map(|u| u.status);
            assert_eq!(first, Some(OrderStatus::Pending));
        }
        let delivered = orders.iter().find(|o| o.id().as_str() == "ORD-12345");
        assert_eq!(delivered.map(|o| o.status_updates().len()), Some(5));
    }

    #[test]
    fn test_sample_notifications() {
        let notifications = sample_notifications(Utc::now());
        assert_eq!(notifications.iter().filter(|n| !n.read).count(), 1);
    }
}
