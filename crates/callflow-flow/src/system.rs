//! Well-known system variable keys.

pub const QUEUE_ARN: &str = "Queue ARN";
pub const QUEUE_NAME: &str = "Queue name";
pub const STORED_CUSTOMER_INPUT: &str = "Stored customer input";
pub const CUSTOMER_NUMBER: &str = "Customer Number";
pub const DIALED_NUMBER: &str = "Dialed Number";
pub const CONTACT_ID: &str = "Contact id";
