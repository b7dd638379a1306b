//! Sample directory data loaded at start-up. Mutations live only in process
//! memory and are lost on restart.

use chrono::{DateTime, NaiveDate, Utc};

use crate::modules::directory::model::{Business, BusinessStatus, PaymentMethod, Review, ReviewStatus};
use crate::modules::notifications::model::{Notification, NotificationKind};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn business(
    id: u32,
    name: &str,
    owner_name: &str,
    municipality: &str,
    category: &str,
    coordinates: Option<(f64, f64)>,
    status: BusinessStatus,
    payment_methods: &[PaymentMethod],
    rating: f64,
    review_count: u32,
    created_at: DateTime<Utc>,
) -> Business {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    Business {
        id,
        name: name.to_string(),
        owner_name: owner_name.to_string(),
        owner_email: format!("{}@example.ph", slug),
        municipality: municipality.to_string(),
        category: category.to_string(),
        description: format!("{} is a local {} business in {}, Batangas.", name, category.to_lowercase(), municipality),
        address: format!("Poblacion, {}, Batangas", municipality),
        latitude: coordinates.map(|c| c.0),
        longitude: coordinates.map(|c| c.1),
        status,
        payment_methods: payment_methods.to_vec(),
        rating,
        review_count,
        phone: Some(format!("+63 917 555 {:04}", id)),
        rejection_reason: None,
        created_at,
        updated_at: created_at,
    }
}

pub fn seed_businesses() -> Vec<Business> {
    use BusinessStatus::*;
    use PaymentMethod::*;

    let mut businesses = vec![
        business(1, "Kapeng Barako Hub", "Maria Santos", "Lipa City", "Food & Beverage",
            Some((13.9411, 121.1631)), Approved, &[Cash, Gcash], 4.7, 128, date(2024, 1, 15)),
        business(2, "Lomi King Batangas", "Jose Dimaculangan", "Batangas City", "Food & Beverage",
            Some((13.7565, 121.0583)), Approved, &[Cash], 4.5, 96, date(2024, 2, 3)),
        business(3, "Bulalo Grill House", "Ana Macalintal", "Batangas City", "Food & Beverage",
            Some((13.7590, 121.0600)), Approved, &[Cash, Gcash, Maya], 4.2, 54, date(2024, 2, 20)),
        business(4, "Tapa ni Aling Nena", "Nena Ilagan", "Batangas City", "Food & Beverage",
            Some((13.7530, 121.0550)), Approved, &[Cash], 4.0, 33, date(2024, 3, 9)),
        business(5, "Panaderia de Batangas", "Ramon Perez", "Batangas City", "Food & Beverage",
            Some((13.7710, 121.0650)), Pending, &[Cash], 0.0, 0, date(2024, 9, 1)),
        business(6, "Taal Heritage Crafts", "Luz Agoncillo", "Taal", "Retail",
            Some((13.8800, 120.9230)), Approved, &[Cash, Gcash, BankTransfer], 4.8, 61, date(2023, 11, 5)),
        business(7, "Balisong Masters", "Pedro Hernandez", "Taal", "Manufacturing",
            Some((13.8815, 120.9210)), Approved, &[Cash, BankTransfer], 4.6, 40, date(2023, 8, 22)),
        business(8, "Anilao Dive Center", "Carlo Mendoza", "Mabini", "Tourism",
            Some((13.7469, 120.9406)), Approved, &[Cash, CreditCard, Gcash], 4.9, 210, date(2023, 6, 14)),
        business(9, "Nasugbu Beach Supplies", "Grace Villanueva", "Nasugbu", "Retail",
            Some((14.0722, 120.6330)), UnderReview, &[Cash, Gcash], 0.0, 0, date(2024, 8, 18)),
        business(10, "Tanauan Agri Supply", "Ernesto Laurel", "Tanauan City", "Agriculture",
            Some((14.0863, 121.1496)), Approved, &[Cash, BankTransfer], 4.1, 22, date(2024, 4, 2)),
        business(11, "Rosario Coffee Farm", "Teresa Marasigan", "Rosario", "Agriculture",
            Some((13.8460, 121.2060)), Approved, &[Cash, Gcash], 4.4, 37, date(2024, 1, 28)),
        business(12, "Lemery Laundry Express", "Mark Castillo", "Lemery", "Services",
            Some((13.8807, 120.9143)), Approved, &[Cash, Gcash, Maya], 3.9, 18, date(2024, 5, 11)),
        business(13, "San Juan Surf & Stay", "Paolo Umali", "San Juan", "Tourism",
            Some((13.8264, 121.3956)), Rejected, &[Cash], 0.0, 0, date(2024, 7, 7)),
        business(14, "Bauan Print Shop", "Liza Bautista", "Bauan", "Services",
            Some((13.7917, 121.0081)), Approved, &[Cash, Gcash], 4.3, 27, date(2024, 3, 30)),
        business(15, "Lipa Tech Repair", "Miguel Reyes", "Lipa City", "Services",
            None, Approved, &[Cash, Gcash], 4.0, 12, date(2024, 6, 19)),
        business(16, "Calaca Hardware", "Rodel Cruz", "Calaca", "Retail",
            Some((13.9300, 120.8130)), Pending, &[Cash], 0.0, 0, date(2024, 9, 12)),
        business(17, "Sto. Tomas Milk Tea", "Kristine Garcia", "Santo Tomas", "Food & Beverage",
            Some((14.1079, 121.1416)), Approved, &[Cash, Gcash, Maya], 4.2, 45, date(2024, 4, 25)),
        business(18, "Batangas Port Eatery", "Danilo Aguilar", "Batangas City", "Food & Beverage",
            Some((13.7590, 121.0440)), Approved, &[Cash], 3.8, 20, date(2023, 12, 1)),
    ];

    if let Some(rejected) = businesses.iter_mut().find(|b| b.id == 13) {
        rejected.rejection_reason = Some("Incomplete business permit".to_string());
    }

    businesses
}

pub fn seed_reviews() -> Vec<Review> {
    let review = |id: u32, business_id: u32, reviewer: &str, rating: u8, comment: &str, status: ReviewStatus, created_at| Review {
        id,
        business_id,
        reviewer_name: reviewer.to_string(),
        rating,
        comment: comment.to_string(),
        status,
        created_at,
    };

    vec![
        review(1, 1, "Jun P.", 5, "Best barako in Lipa, strong and smooth.", ReviewStatus::Visible, date(2024, 5, 2)),
        review(2, 2, "Aileen R.", 5, "Classic Batangas lomi, generous toppings.", ReviewStatus::Visible, date(2024, 5, 18)),
        review(3, 2, "Mike T.", 4, "Long queue at lunch but worth it.", ReviewStatus::Visible, date(2024, 6, 1)),
        review(4, 3, "Carla D.", 4, "Bulalo was rich, parking is tight.", ReviewStatus::Visible, date(2024, 6, 12)),
        review(5, 4, "Anonymous", 1, "Buy followers at my site!!!", ReviewStatus::Flagged, date(2024, 6, 20)),
        review(6, 6, "Rina S.", 5, "Beautiful embroidery, fair prices.", ReviewStatus::Visible, date(2024, 7, 3)),
        review(7, 8, "Tom K.", 5, "Great guides and well maintained gear.", ReviewStatus::Visible, date(2024, 7, 9)),
        review(8, 12, "Joy M.", 3, "Clean clothes, slow turnaround on weekends.", ReviewStatus::Visible, date(2024, 7, 21)),
        review(9, 14, "Ben L.", 4, "Fast tarpaulin printing.", ReviewStatus::Visible, date(2024, 8, 2)),
        review(10, 18, "Sheila V.", 2, "Food was cold.", ReviewStatus::Hidden, date(2024, 8, 15)),
    ]
}

pub fn seed_notifications() -> Vec<Notification> {
    let notification = |id: u32, kind, title: &str, message: &str, read: bool, created_at| Notification {
        id,
        kind,
        title: title.to_string(),
        message: message.to_string(),
        read,
        created_at,
    };

    vec![
        notification(1, NotificationKind::SmeRegistration, "New SME registration",
            "Panaderia de Batangas submitted a listing for verification.", false, date(2024, 9, 1)),
        notification(2, NotificationKind::SmeRegistration, "New SME registration",
            "Calaca Hardware submitted a listing for verification.", false, date(2024, 9, 12)),
        notification(3, NotificationKind::Review, "Review flagged",
            "A review on Tapa ni Aling Nena was flagged as spam.", false, date(2024, 6, 20)),
        notification(4, NotificationKind::System, "Scheduled maintenance",
            "Database maintenance window on Sunday 02:00-03:00.", true, date(2024, 8, 30)),
        notification(5, NotificationKind::User, "New administrator",
            "An administrator account was added.", true, date(2024, 4, 1)),
        notification(6, NotificationKind::SmeRegistration, "Listing under review",
            "Nasugbu Beach Supplies moved to review.", true, date(2024, 8, 19)),
    ]
}
