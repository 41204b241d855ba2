//! Request/response DTO types for the REST API.

pub mod appointment_dto;
pub mod schedule_dto;

pub use appointment_dto::{
    AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
};
pub use schedule_dto::{AvailabilityResponse, ScheduleResponse, SetScheduleRequest};
