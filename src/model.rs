//! Booking and vehicle values.
//!
//! Both are immutable once constructed. Construction goes through the
//! `*Input` wire shapes so out-of-range fields are rejected at the boundary
//! and the rest of the planner can trust what it receives.

use std::fmt;

use jiff::SignedDuration;
use jiff::civil::Time;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlannerError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(Time);

impl TimeOfDay {
    pub fn new(hour: i8, minute: i8) -> Result<Self, PlannerError> {
        Time::new(hour, minute, 0, 0)
            .map(Self)
            .map_err(|err| PlannerError::InvalidTime {
                value: format!("{hour}:{minute:02}"),
                reason: err.to_string(),
            })
    }

    /// Parses `9:00 AM`, `09:00AM`, `09:00` or `09:00:00`.
    pub fn parse(value: &str) -> Result<Self, PlannerError> {
        let invalid = |reason: String| PlannerError::InvalidTime {
            value: value.to_string(),
            reason,
        };

        let upper = value.trim().to_ascii_uppercase();
        let (clock, meridiem) = if let Some(clock) = upper.strip_suffix("AM") {
            (clock.trim_end(), Some("AM"))
        } else if let Some(clock) = upper.strip_suffix("PM") {
            (clock.trim_end(), Some("PM"))
        } else {
            (upper.as_str(), None)
        };

        // jiff wants zero-padded hours
        let clock = if clock.find(':') == Some(1) {
            format!("0{clock}")
        } else {
            clock.to_string()
        };

        let parsed = match meridiem {
            Some(meridiem) => Time::strptime("%I:%M %p", format!("{clock} {meridiem}")),
            None if clock.len() > 5 => Time::strptime("%H:%M:%S", &clock),
            None => Time::strptime("%H:%M", &clock),
        }
        .map_err(|err| invalid(err.to_string()))?;

        Time::new(parsed.hour(), parsed.minute(), 0, 0)
            .map(Self)
            .map_err(|err| invalid(err.to_string()))
    }

    /// Parses an optional time where empty or `OPEN` means no fixed time.
    pub fn parse_open(value: Option<&str>) -> Result<Option<Self>, PlannerError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) if text.eq_ignore_ascii_case("open") => Ok(None),
            Some(text) => Self::parse(text).map(Some),
        }
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.0.hour()) * 60 + i64::from(self.0.minute())
    }

    /// Signed minutes from `self` to `later`.
    pub fn minutes_until(&self, later: TimeOfDay) -> i64 {
        later.minutes_since_midnight() - self.minutes_since_midnight()
    }

    /// Adds minutes, clamping to 23:59 instead of wrapping past midnight.
    pub fn saturating_add_minutes(&self, minutes: i64) -> Self {
        self.0
            .checked_add(SignedDuration::from_mins(minutes))
            .map(Self)
            .unwrap_or(Self(jiff::civil::time(23, 59, 0, 0)))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.strftime("%I:%M %p"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Wire shape of a booking before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingInput {
    pub id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub pickup_time: Option<String>,
    pub pickup_address: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    #[serde(default)]
    pub appointment_time: Option<String>,
    pub dropoff_address: String,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    #[serde(default = "default_passenger_count")]
    pub passenger_count: i64,
    #[serde(default)]
    pub ontime: Option<bool>,
}

fn default_passenger_count() -> i64 {
    1
}

impl Default for BookingInput {
    fn default() -> Self {
        Self {
            id: String::new(),
            client_name: String::new(),
            pickup_time: None,
            pickup_address: String::new(),
            pickup_latitude: 0.0,
            pickup_longitude: 0.0,
            appointment_time: None,
            dropoff_address: String::new(),
            dropoff_latitude: 0.0,
            dropoff_longitude: 0.0,
            passenger_count: default_passenger_count(),
            ontime: None,
        }
    }
}

/// A same-day passenger booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookingInput")]
pub struct Booking {
    id: BookingId,
    client_name: String,
    pickup_time: Option<TimeOfDay>,
    pickup_address: String,
    pickup_latitude: f64,
    pickup_longitude: f64,
    appointment_time: Option<TimeOfDay>,
    dropoff_address: String,
    dropoff_latitude: f64,
    dropoff_longitude: f64,
    passenger_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    ontime: Option<bool>,
}

impl TryFrom<BookingInput> for Booking {
    type Error = PlannerError;

    fn try_from(input: BookingInput) -> Result<Self, Self::Error> {
        let invalid = |reason: String| PlannerError::InvalidBooking {
            id: input.id.clone(),
            reason,
        };

        if input.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        let passenger_count = u32::try_from(input.passenger_count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                invalid(format!(
                    "passenger_count must be positive, got {}",
                    input.passenger_count
                ))
            })?;
        check_coordinates(input.pickup_latitude, input.pickup_longitude)
            .map_err(|reason| invalid(format!("pickup {reason}")))?;
        check_coordinates(input.dropoff_latitude, input.dropoff_longitude)
            .map_err(|reason| invalid(format!("dropoff {reason}")))?;

        let pickup_time = TimeOfDay::parse_open(input.pickup_time.as_deref())?;
        let appointment_time = TimeOfDay::parse_open(input.appointment_time.as_deref())?;

        Ok(Self {
            id: BookingId(input.id),
            client_name: input.client_name,
            pickup_time,
            pickup_address: input.pickup_address,
            pickup_latitude: input.pickup_latitude,
            pickup_longitude: input.pickup_longitude,
            appointment_time,
            dropoff_address: input.dropoff_address,
            dropoff_latitude: input.dropoff_latitude,
            dropoff_longitude: input.dropoff_longitude,
            passenger_count,
            ontime: input.ontime,
        })
    }
}

impl Booking {
    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Pickup time, or `None` for an open pickup.
    pub fn pickup_time(&self) -> Option<TimeOfDay> {
        self.pickup_time
    }

    pub fn pickup_address(&self) -> &str {
        &self.pickup_address
    }

    /// Pickup coordinates (lat, lng).
    pub fn pickup_location(&self) -> (f64, f64) {
        (self.pickup_latitude, self.pickup_longitude)
    }

    pub fn appointment_time(&self) -> Option<TimeOfDay> {
        self.appointment_time
    }

    pub fn dropoff_address(&self) -> &str {
        &self.dropoff_address
    }

    /// Dropoff coordinates (lat, lng).
    pub fn dropoff_location(&self) -> (f64, f64) {
        (self.dropoff_latitude, self.dropoff_longitude)
    }

    pub fn passenger_count(&self) -> u32 {
        self.passenger_count
    }

    pub fn ontime(&self) -> Option<bool> {
        self.ontime
    }
}

fn check_coordinates(lat: f64, lng: f64) -> Result<(), String> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(format!("coordinates must be finite, got ({lat}, {lng})"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude out of range: {lat}"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude out of range: {lng}"));
    }
    Ok(())
}

/// Wire shape of a vehicle before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleInput {
    pub id: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    pub capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VehicleInput")]
pub struct Vehicle {
    id: VehicleId,
    driver_name: Option<String>,
    capacity: u32,
}

impl TryFrom<VehicleInput> for Vehicle {
    type Error = PlannerError;

    fn try_from(input: VehicleInput) -> Result<Self, Self::Error> {
        if input.id.trim().is_empty() {
            return Err(PlannerError::InvalidVehicle {
                id: input.id,
                reason: "id must not be empty".to_string(),
            });
        }
        let capacity = u32::try_from(input.capacity)
            .ok()
            .filter(|capacity| *capacity > 0)
            .ok_or_else(|| PlannerError::InvalidVehicle {
                id: input.id.clone(),
                reason: format!("capacity must be positive, got {}", input.capacity),
            })?;

        Ok(Self {
            id: VehicleId(input.id),
            driver_name: input.driver_name,
            capacity,
        })
    }
}

impl Vehicle {
    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn driver_name(&self) -> Option<&str> {
        self.driver_name.as_deref()
    }

    /// Seat capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
