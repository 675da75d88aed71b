pub mod add;
pub mod due;
pub mod extract;
pub mod feedback;
pub mod status;
pub mod validate;
