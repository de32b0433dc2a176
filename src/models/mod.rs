pub mod animation;
pub mod booking;
pub mod draft;
pub mod service;

pub use animation::{AnimationSequence, ScrollTrigger, Tween, TweenFrom};
pub use booking::BookingRecord;
pub use draft::{BookingDraft, ContactDetails, Field, FieldErrors, Step, SubmissionState};
pub use service::{Service, SERVICES, TIME_SLOTS};
