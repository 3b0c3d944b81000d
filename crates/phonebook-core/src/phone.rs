//! Phone-number grammar validation.
//!
//! The service only sees the [`PhoneValidator`] capability. The default
//! implementation parses with the `phonenumber` crate (libphonenumber
//! metadata) and no default region, so numbers must carry their own
//! `+<country code>` prefix.

/// Reports whether a string is a structurally valid phone number.
pub trait PhoneValidator: Send + Sync {
  fn validate(&self, phone_number: &str) -> bool;
}

/// International-format validator backed by libphonenumber metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternationalPhoneValidator;

impl PhoneValidator for InternationalPhoneValidator {
  fn validate(&self, phone_number: &str) -> bool {
    match phonenumber::parse(None, phone_number) {
      Ok(number) => phonenumber::is_valid(&number),
      Err(_) => false,
    }
  }
}
