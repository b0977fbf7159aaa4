use crate::core::scheduling::parse_slot;
use crate::domain::model::{Booking, BookingKind, ServicePackage};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SherpaError};
use crate::utils::validation::require_text;
use chrono::Utc;
use tokio::sync::Mutex;

pub const LEDGER_FILE: &str = "bookings.json";

/// Append-only list of test-drive and service bookings kept in a single
/// JSON file. Writes are serialised through `lock` so concurrent bookings
/// never reuse an id.
pub struct BookingLedger<S: Storage> {
    storage: S,
    packages: Vec<ServicePackage>,
    lock: Mutex<()>,
}

impl<S: Storage> BookingLedger<S> {
    pub fn new(storage: S, packages: Vec<ServicePackage>) -> Self {
        Self {
            storage,
            packages,
            lock: Mutex::new(()),
        }
    }

    pub fn packages(&self) -> &[ServicePackage] {
        &self.packages
    }

    pub async fn list(&self) -> Result<Vec<Booking>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    pub async fn book_test_drive(&self, user_phone: &str, car_model: &str, slot: &str) -> Result<Booking> {
        self.append(BookingKind::TestDrive, user_phone, car_model, slot, None)
            .await
    }

    pub async fn book_service(
        &self,
        user_phone: &str,
        car_model: &str,
        slot: &str,
        package_id: Option<&str>,
    ) -> Result<Booking> {
        if let Some(id) = package_id {
            if !self.packages.iter().any(|p| p.id == id) {
                return Err(SherpaError::validation(format!(
                    "unknown service package '{}'",
                    id
                )));
            }
        }

        self.append(BookingKind::Service, user_phone, car_model, slot, package_id)
            .await
    }

    async fn append(
        &self,
        kind: BookingKind,
        user_phone: &str,
        car_model: &str,
        slot: &str,
        package_id: Option<&str>,
    ) -> Result<Booking> {
        require_text("user_phone", user_phone)?;
        require_text("car_model", car_model)?;
        parse_slot(slot)?;

        let _guard = self.lock.lock().await;
        let mut bookings = self.load().await?;

        let booking = Booking {
            id: bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1,
            kind,
            user_phone: user_phone.to_string(),
            car_model: car_model.to_string(),
            slot: slot.to_string(),
            package_id: package_id.map(str::to_string),
            status: "created".to_string(),
            created_at: Utc::now(),
        };
        bookings.push(booking.clone());

        let data = serde_json::to_vec_pretty(&bookings)?;
        self.storage.write_file(LEDGER_FILE, &data).await?;

        tracing::info!(
            "📅 Booked {:?} #{} for {} at {}",
            booking.kind,
            booking.id,
            booking.car_model,
            booking.slot
        );
        Ok(booking)
    }

    async fn load(&self) -> Result<Vec<Booking>> {
        match self.storage.read_file(LEDGER_FILE).await {
            Ok(data) if data.is_empty() => Ok(Vec::new()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(SherpaError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
