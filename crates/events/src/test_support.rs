use agendizo_db::models::appointment::AppointmentDetail;
use chrono::{NaiveDate, NaiveTime, Utc};

pub fn sample_detail() -> AppointmentDetail {
    AppointmentDetail {
        id: 10,
        business_id: 3,
        business_name: "Studio Ana".to_string(),
        owner_id: 1,
        owner_email: "ana@studio.com".to_string(),
        service_id: 5,
        service_name: "Corte".to_string(),
        price_cents: 2500,
        client_id: 8,
        client_name: "Maria".to_string(),
        client_email: Some("maria@example.com".to_string()),
        client_phone: Some("(11) 98765-4321".to_string()),
        appointment_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        start_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        status: "pending".to_string(),
        notes: None,
        created_at: Utc::now(),
    }
}
