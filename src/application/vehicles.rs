//! Vehicle registration and OCR-assisted document scanning

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::domain::ports::{ApiGateway, FilePart, MultipartForm};
use crate::domain::vehicle::{RegistrationScan, Vehicle};
use crate::domain::DomainResult;
use crate::shared::wire;

/// New vehicle submission. The VIN is fixed once registered.
#[derive(Debug, Clone, Validate)]
pub struct RegisterVehicleRequest {
    #[validate(length(min = 17, max = 17, message = "VIN must be exactly 17 characters"))]
    pub vin: String,
    #[validate(length(min = 4, max = 16, message = "plate must be 4–16 characters"))]
    pub plate: String,
    #[validate(length(min = 1, message = "vehicle model is required"))]
    pub vehicle_model_id: String,
    pub photo: Option<FilePart>,
    pub registration_photo: Option<FilePart>,
}

/// 17 characters, alphanumeric, and the standard exclusion of I/O/Q.
fn valid_vin(vin: &str) -> bool {
    vin.len() == 17
        && vin.chars().all(|c| {
            c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q'))
        })
}

pub struct VehicleService {
    gateway: Arc<dyn ApiGateway>,
}

impl VehicleService {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> DomainResult<Vec<Vehicle>> {
        let value = self.gateway.get("api/v1/vehicles").await?;
        let (vehicles, _) = wire::decode_list(value)?;
        Ok(vehicles)
    }

    /// Register a vehicle with its photos as one multipart submission.
    pub async fn register(&self, request: RegisterVehicleRequest) -> DomainResult<Vehicle> {
        request.validate()?;
        if !valid_vin(&request.vin) {
            return Err(crate::domain::DomainError::Validation(
                "VIN must be 17 characters, digits and uppercase letters excluding I, O and Q"
                    .to_string(),
            ));
        }

        let mut form = MultipartForm::new()
            .text("Vin", request.vin.clone())
            .text("Plate", request.plate.clone())
            .text("VehicleModelId", request.vehicle_model_id.clone());
        if let Some(mut photo) = request.photo {
            photo.name = "Photo".to_string();
            form.files.push(photo);
        }
        if let Some(mut registration) = request.registration_photo {
            registration.name = "RegistrationPhoto".to_string();
            form.files.push(registration);
        }

        let value = self.gateway.post_multipart("api/v1/vehicles", form).await?;
        let vehicle: Vehicle = wire::decode(value)?;
        info!(vin = %vehicle.vin, plate = %vehicle.plate, "Vehicle registered");
        Ok(vehicle)
    }

    /// Upload a registration document for OCR. The scan result carries
    /// its own confidence and error message; prefill policy lives in
    /// [`RegistrationScan::apply_to`].
    pub async fn scan_registration(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> DomainResult<RegistrationScan> {
        let form = MultipartForm::new().file("image", file_name, mime, bytes);
        let value = self
            .gateway
            .post_multipart("api/v1/vehicles/scan-registration", form)
            .await?;
        Ok(wire::decode(value)?)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> RegisterVehicleRequest {
        RegisterVehicleRequest {
            vin: "RLHPC3506MY200001".into(),
            plate: "59X1-123.45".into(),
            vehicle_model_id: "VM-1".into(),
            photo: None,
            registration_photo: None,
        }
    }

    #[test]
    fn valid_vin_passes() {
        assert!(sample_request().validate().is_ok());
        assert!(valid_vin(&sample_request().vin));
    }

    #[test]
    fn vin_must_be_17_chars_without_ioq() {
        let mut request = sample_request();
        request.vin = "SHORT".into();
        assert!(request.validate().is_err());

        assert!(!valid_vin("RLHPC3506MY20000I")); // contains I
        assert!(!valid_vin("rlhpc3506my200001")); // lowercase
        assert!(!valid_vin("RLHPC3506MY20000")); // 16 chars
    }

    #[test]
    fn plate_length_bounds() {
        let mut request = sample_request();
        request.plate = "A".into();
        assert!(request.validate().is_err());
    }
}
