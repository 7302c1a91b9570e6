//! Integration tests for the repository layer against a real database.
//!
//! Covers the queries with non-trivial SQL: appointment sweeps, reminder
//! selection, client lookup by contact, slug checks and the settings and
//! subscription upserts.

use agendizo_core::appointment::{STATUS_CANCELLED, STATUS_COMPLETED, STATUS_CONFIRMED, STATUS_PENDING};
use agendizo_db::models::appointment::{AppointmentFilter, CreateAppointment};
use agendizo_db::models::business::{Business, CreateBusiness, DayHours};
use agendizo_db::models::client::{Client, CreateClient};
use agendizo_db::models::feedback::CreateFeedback;
use agendizo_db::models::notification::UpdateNotificationSettings;
use agendizo_db::models::service::{CreateService, Service};
use agendizo_db::models::session::CreateSession;
use agendizo_db::models::subscription::UpsertSubscription;
use agendizo_db::models::user::CreateUser;
use agendizo_db::repositories::{
    AppointmentRepo, BusinessHoursRepo, BusinessRepo, ClientRepo, FeedbackRepo,
    NotificationSettingsRepo, ServiceRepo, SessionRepo, SubscriptionRepo, UserRepo,
};
use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    business: Business,
    service: Service,
    client: Client,
}

async fn seed(pool: &PgPool, email: &str, slug: &str) -> Fixture {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();

    let business = BusinessRepo::create(
        pool,
        &CreateBusiness {
            owner_id: user.id,
            name: "Studio Ana".to_string(),
            slug: slug.to_string(),
            description: None,
            phone: None,
            email: None,
            address: None,
            utc_offset_minutes: None,
        },
    )
    .await
    .unwrap();

    let service = ServiceRepo::create(
        pool,
        business.id,
        &CreateService {
            name: "Corte".to_string(),
            description: None,
            duration_minutes: 30,
            price_cents: 2500,
        },
    )
    .await
    .unwrap();

    let client = ClientRepo::create(
        pool,
        business.id,
        &CreateClient {
            name: "Maria".to_string(),
            email: Some("maria@example.com".to_string()),
            phone: Some("11987654321".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap();

    Fixture {
        business,
        service,
        client,
    }
}

/// Current wall-clock time of the business, shifted by `delta`.
fn local_now(business: &Business, delta: Duration) -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::minutes(business.utc_offset_minutes as i64) + delta
}

fn booking_at(f: &Fixture, start: NaiveDateTime, status: &str) -> CreateAppointment {
    CreateAppointment {
        business_id: f.business.id,
        service_id: f.service.id,
        client_id: f.client.id,
        appointment_date: start.date(),
        start_time: start.time(),
        end_time: start.time() + Duration::minutes(30),
        status: status.to_string(),
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn complete_elapsed_only_touches_past_open_appointments(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    let yesterday = local_now(&f.business, Duration::days(-1))
        .date()
        .and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    let next_week = local_now(&f.business, Duration::days(7))
        .date()
        .and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap());

    let past_pending = AppointmentRepo::create(&pool, &booking_at(&f, yesterday, STATUS_PENDING))
        .await
        .unwrap();
    let past_confirmed =
        AppointmentRepo::create(&pool, &booking_at(&f, yesterday, STATUS_CONFIRMED))
            .await
            .unwrap();
    let past_cancelled =
        AppointmentRepo::create(&pool, &booking_at(&f, yesterday, STATUS_CANCELLED))
            .await
            .unwrap();
    let future = AppointmentRepo::create(&pool, &booking_at(&f, next_week, STATUS_PENDING))
        .await
        .unwrap();

    let updated = AppointmentRepo::complete_elapsed(&pool).await.unwrap();
    assert_eq!(updated, 2);

    let status = |id| {
        let pool = pool.clone();
        async move {
            AppointmentRepo::find_by_id(&pool, id)
                .await
                .unwrap()
                .unwrap()
                .status
        }
    };
    assert_eq!(status(past_pending.id).await, STATUS_COMPLETED);
    assert_eq!(status(past_confirmed.id).await, STATUS_COMPLETED);
    assert_eq!(status(past_cancelled.id).await, STATUS_CANCELLED);
    assert_eq!(status(future.id).await, STATUS_PENDING);

    // Running again finds nothing left to do.
    assert_eq!(AppointmentRepo::complete_elapsed(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn due_reminders_respect_window_and_stamp(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;

    let soon = AppointmentRepo::create(
        &pool,
        &booking_at(&f, local_now(&f.business, Duration::hours(2)), STATUS_CONFIRMED),
    )
    .await
    .unwrap();
    AppointmentRepo::create(
        &pool,
        &booking_at(&f, local_now(&f.business, Duration::hours(48)), STATUS_CONFIRMED),
    )
    .await
    .unwrap();
    AppointmentRepo::create(
        &pool,
        &booking_at(&f, local_now(&f.business, Duration::hours(3)), STATUS_CANCELLED),
    )
    .await
    .unwrap();

    let due = AppointmentRepo::list_due_reminders(&pool).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, soon.id);
    assert_eq!(due[0].client_email.as_deref(), Some("maria@example.com"));
    assert_eq!(due[0].owner_email, "owner@example.com");

    AppointmentRepo::mark_reminder_sent(&pool, soon.id).await.unwrap();
    assert!(AppointmentRepo::list_due_reminders(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn due_reminders_skip_owners_who_opted_out(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    AppointmentRepo::create(
        &pool,
        &booking_at(&f, local_now(&f.business, Duration::hours(2)), STATUS_PENDING),
    )
    .await
    .unwrap();

    NotificationSettingsRepo::upsert(
        &pool,
        f.business.owner_id,
        &UpdateNotificationSettings {
            notify_reminder: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(AppointmentRepo::list_due_reminders(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_status_and_date(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    let day = local_now(&f.business, Duration::days(3))
        .date()
        .and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());

    AppointmentRepo::create(&pool, &booking_at(&f, day, STATUS_PENDING))
        .await
        .unwrap();
    AppointmentRepo::create(&pool, &booking_at(&f, day + Duration::hours(1), STATUS_CONFIRMED))
        .await
        .unwrap();

    let all = AppointmentRepo::list_for_business(&pool, f.business.id, &AppointmentFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].start_time < all[1].start_time);
    assert_eq!(all[0].service_name, "Corte");

    let confirmed = AppointmentRepo::list_for_business(
        &pool,
        f.business.id,
        &AppointmentFilter {
            status: Some(STATUS_CONFIRMED.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(confirmed.len(), 1);

    let before = AppointmentRepo::list_for_business(
        &pool,
        f.business.id,
        &AppointmentFilter {
            to: Some(day.date() - Duration::days(1)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(before.is_empty());
}

// ---------------------------------------------------------------------------
// Businesses, hours, clients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn slug_exists_honours_exclusion(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;

    assert!(BusinessRepo::slug_exists(&pool, "studio-ana", None).await.unwrap());
    assert!(!BusinessRepo::slug_exists(&pool, "studio-ana", Some(f.business.id))
        .await
        .unwrap());
    assert!(!BusinessRepo::slug_exists(&pool, "other", None).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_violates_constraint(pool: PgPool) {
    seed(&pool, "owner@example.com", "studio-ana").await;
    let other = UserRepo::create(
        &pool,
        &CreateUser {
            email: "second@example.com".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();

    let err = BusinessRepo::create(
        &pool,
        &CreateBusiness {
            owner_id: other.id,
            name: "Studio Ana".to_string(),
            slug: "studio-ana".to_string(),
            description: None,
            phone: None,
            email: None,
            address: None,
            utc_offset_minutes: None,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_businesses_slug"));
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_week_overwrites_previous_hours(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    let nine = NaiveTime::from_hms_opt(9, 0, 0);
    let six = NaiveTime::from_hms_opt(18, 0, 0);

    let week: Vec<DayHours> = (0..7)
        .map(|weekday| DayHours {
            weekday,
            opens_at: nine,
            closes_at: six,
            is_closed: weekday == 0,
        })
        .collect();
    BusinessHoursRepo::replace_week(&pool, f.business.id, &week)
        .await
        .unwrap();

    let saturday_only = vec![DayHours {
        weekday: 6,
        opens_at: nine,
        closes_at: NaiveTime::from_hms_opt(13, 0, 0),
        is_closed: false,
    }];
    let hours = BusinessHoursRepo::replace_week(&pool, f.business.id, &saturday_only)
        .await
        .unwrap();

    assert_eq!(hours.len(), 1);
    assert_eq!(hours[0].weekday, 6);
    assert_eq!(
        BusinessHoursRepo::list_for_business(&pool, f.business.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_contact_matches_phone_or_email(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;

    let by_phone = ClientRepo::find_by_contact(&pool, f.business.id, None, Some("11987654321"))
        .await
        .unwrap();
    assert_eq!(by_phone.map(|c| c.id), Some(f.client.id));

    let by_email =
        ClientRepo::find_by_contact(&pool, f.business.id, Some("MARIA@example.com"), None)
            .await
            .unwrap();
    assert_eq!(by_email.map(|c| c.id), Some(f.client.id));

    let none = ClientRepo::find_by_contact(&pool, f.business.id, None, None)
        .await
        .unwrap();
    assert!(none.is_none());
}

// ---------------------------------------------------------------------------
// Feedback, settings, subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn feedback_ratings_are_collected(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    for rating in [5, 4] {
        FeedbackRepo::create(
            &pool,
            f.business.id,
            &CreateFeedback {
                client_name: "Maria".to_string(),
                rating,
                comment: None,
            },
        )
        .await
        .unwrap();
    }

    let mut ratings = FeedbackRepo::ratings_for_business(&pool, f.business.id)
        .await
        .unwrap();
    ratings.sort();
    assert_eq!(ratings, vec![4, 5]);
    assert_eq!(
        FeedbackRepo::list_for_business(&pool, f.business.id, 1)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn notification_settings_default_then_patch(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    let owner = f.business.owner_id;

    assert!(NotificationSettingsRepo::find(&pool, owner).await.unwrap().is_none());

    let defaults = NotificationSettingsRepo::get_or_create(&pool, owner).await.unwrap();
    assert!(defaults.email_enabled);
    assert!(!defaults.sms_enabled);
    assert_eq!(defaults.reminder_hours_before, 24);

    let patched = NotificationSettingsRepo::upsert(
        &pool,
        owner,
        &UpdateNotificationSettings {
            sms_enabled: Some(true),
            reminder_hours_before: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(patched.email_enabled);
    assert!(patched.sms_enabled);
    assert_eq!(patched.reminder_hours_before, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn subscription_upsert_and_provider_update(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    let owner = f.business.owner_id;

    let created = SubscriptionRepo::upsert(
        &pool,
        &UpsertSubscription {
            user_id: owner,
            stripe_customer_id: Some("cus_1".to_string()),
            stripe_subscription_id: Some("sub_1".to_string()),
            price_id: Some("price_1".to_string()),
            status: "active".to_string(),
            current_period_end: None,
        },
    )
    .await
    .unwrap();
    assert!(created.is_active());

    let again = SubscriptionRepo::upsert(
        &pool,
        &UpsertSubscription {
            user_id: owner,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            price_id: None,
            status: "trialing".to_string(),
            current_period_end: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(again.id, created.id);
    assert_eq!(again.stripe_customer_id.as_deref(), Some("cus_1"));

    let upgraded = SubscriptionRepo::update_by_stripe_subscription(
        &pool,
        "sub_1",
        "active",
        Some("price_pro"),
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(upgraded.price_id.as_deref(), Some("price_pro"));

    let cancelled =
        SubscriptionRepo::update_by_stripe_subscription(&pool, "sub_1", "canceled", None, None)
            .await
            .unwrap()
            .unwrap();
    assert!(!cancelled.is_active());
    assert_eq!(cancelled.price_id.as_deref(), Some("price_pro"));

    let unknown =
        SubscriptionRepo::update_by_stripe_subscription(&pool, "sub_x", "active", None, None)
            .await
            .unwrap();
    assert!(unknown.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn sessions_revoke_and_cleanup(pool: PgPool) {
    let f = seed(&pool, "owner@example.com", "studio-ana").await;
    let user_id = f.business.owner_id;

    let session = |expires_at| CreateSession {
        user_id,
        expires_at,
        user_agent: Some("test".to_string()),
        ip_address: Some("203.0.113.7".to_string()),
    };
    let live = SessionRepo::create(&pool, &session(Utc::now() + Duration::days(30)))
        .await
        .unwrap();
    let expired = SessionRepo::create(&pool, &session(Utc::now() - Duration::hours(1)))
        .await
        .unwrap();
    let revoked = SessionRepo::create(&pool, &session(Utc::now() + Duration::days(30)))
        .await
        .unwrap();

    assert!(SessionRepo::find_active(&pool, live.id, user_id).await.unwrap().is_some());
    assert!(SessionRepo::find_active(&pool, expired.id, user_id).await.unwrap().is_none());

    assert!(SessionRepo::revoke(&pool, revoked.id).await.unwrap());
    assert!(!SessionRepo::revoke(&pool, revoked.id).await.unwrap());
    assert!(SessionRepo::find_active(&pool, revoked.id, user_id).await.unwrap().is_none());

    let other = seed(&pool, "other@example.com", "studio-bia").await;
    assert!(
        SessionRepo::find_active(&pool, live.id, other.business.owner_id)
            .await
            .unwrap()
            .is_none(),
        "a session only authenticates its own user"
    );

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 2);
    assert!(SessionRepo::find_active(&pool, live.id, user_id).await.unwrap().is_some());
}
