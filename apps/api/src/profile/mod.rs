// User business profile, tenancy, writing style and personal stories.

pub mod handlers;
pub mod tenancy;
