use std::sync::Arc;

use bookery::model::{EventKind, ImageUpload, NewCatalogItem, NewEvent, ResourceRef, SignUpForm};
use bookery::service::{AccountService, BookingService, CalendarService, CatalogService};
use bookery::store::{MemoryAuth, MemoryFiles, MemoryStore};
use bookery::{BookingError, BookingResult, Config};
use chrono::{Days, Local, NaiveTime};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!("demo failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> BookingResult<()> {
    let config = Config::load()?;
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuth::new());
    let files = Arc::new(MemoryFiles::default());

    let accounts = AccountService::new(store.clone(), auth);
    let catalog = CatalogService::new(store.clone(), files, config.image_prefix.clone());
    let bookings = BookingService::new(store.clone(), config);
    let calendar = CalendarService::new(store);

    let _events = calendar.subscribe(|events| info!(count = events.len(), "calendar refreshed"));

    let me = accounts
        .sign_up(&SignUpForm {
            display_name: "Demo User".into(),
            email: "demo@example.org".into(),
            password: "demo-pass".into(),
            confirm_password: "demo-pass".into(),
            terms_accepted: true,
        })
        .await?;
    info!(uid = %me.uid, name = %me.display_name, "signed up");

    let camera = catalog
        .add_equipment(
            NewCatalogItem::new("Camera", "Photo").with_description("Mirrorless body"),
            Some(ImageUpload::new("camera.png", vec![0x89, b'P', b'N', b'G'])),
        )
        .await?;

    let tomorrow = Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| Local::now().date_naive());
    let resource = ResourceRef::equipment(camera.id.clone());

    let first = bookings.draft(resource.clone(), tomorrow);
    let booked = bookings.book(first).await?;
    info!(start = %booked.start_time, end = %booked.end_time, "first booking accepted");

    let mut clash = bookings.draft(resource.clone(), tomorrow);
    bookings.change_start(&mut clash, "09:30".parse()?);
    match bookings.book(clash).await {
        Ok(_) => error!("overlapping booking was accepted"),
        Err(e) => info!(reason = %e.user_message(), "overlapping booking rejected"),
    }

    for slot in bookings.free_intervals(&resource, tomorrow).await? {
        info!(%slot, "free");
    }

    let at = NaiveTime::from_hms_opt(booked.start_time.hour().into(), booked.start_time.minute().into(), 0)
        .ok_or_else(|| BookingError::validation("booking start is not a valid time"))?;
    let start = tomorrow.and_time(at);
    calendar
        .add_event(NewEvent::new("Camera shoot", EventKind::Booking, start).for_equipment(&camera.id))
        .await?;
    for event in calendar.list_events().await? {
        info!(title = %event.display_title(), color = event.color(), "calendar entry");
    }
    Ok(())
}
