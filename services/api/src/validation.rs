//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Valid working day names for vehicle schedules
pub const VALID_WORK_DAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miercoles",
    "jueves",
    "viernes",
    "sabado",
    "domingo",
];

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a vehicle registration plate, e.g. ABP468B
pub fn validate_plate(plate: &str) -> Result<(), String> {
    static PLATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PLATE_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Z]{3}[0-9]{3}[A-Z]$").expect("Failed to compile plate regex")
    });

    if !regex.is_match(plate) {
        return Err("Invalid plate format (e.g. ABP468B)".to_string());
    }

    Ok(())
}

/// Validate a route name
pub fn validate_route(route: &str) -> Result<(), String> {
    if route.trim().is_empty() {
        return Err("Route is required".to_string());
    }

    Ok(())
}

/// Validate a schedule time in HH:mm format
pub fn validate_schedule_time(time: &str) -> Result<(), String> {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TIME_REGEX.get_or_init(|| {
        Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("Failed to compile time regex")
    });

    if !regex.is_match(time) {
        return Err("Invalid schedule time format (HH:mm)".to_string());
    }

    Ok(())
}

/// Validate a set of working days
pub fn validate_work_days(days: &[String]) -> Result<(), String> {
    if days.is_empty() {
        return Err("At least one working day is required".to_string());
    }

    for day in days {
        if !VALID_WORK_DAYS.contains(&day.as_str()) {
            return Err(format!("Invalid working day: {}", day));
        }
    }

    Ok(())
}

/// Validate an incident description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ana Torres").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("driver.01+fleet@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("ABP468B").is_ok());
        assert!(validate_plate("abp468b").is_err());
        assert!(validate_plate("AB468B").is_err());
        assert!(validate_plate("ABP4681").is_err());
        assert!(validate_plate("").is_err());
    }

    #[test]
    fn test_validate_schedule_time() {
        assert!(validate_schedule_time("05:00").is_ok());
        assert!(validate_schedule_time("5:00").is_ok());
        assert!(validate_schedule_time("23:59").is_ok());
        assert!(validate_schedule_time("24:00").is_err());
        assert!(validate_schedule_time("12:60").is_err());
        assert!(validate_schedule_time("noon").is_err());
    }

    #[test]
    fn test_validate_work_days() {
        let days = |names: &[&str]| names.iter().map(|d| d.to_string()).collect::<Vec<_>>();

        assert!(validate_work_days(&days(&["lunes", "viernes"])).is_ok());
        assert!(validate_work_days(&days(&VALID_WORK_DAYS)).is_ok());
        assert!(validate_work_days(&[]).is_err());
        assert!(validate_work_days(&days(&["lunes", "monday"])).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Llanta ponchada").is_ok());
        assert!(validate_description("  ").is_err());
    }
}
