pub mod bookings;
pub mod reservation;
pub mod room;
pub mod search;
pub mod user;
