mod logging;
mod schedule_url;
mod template;

pub use logging::{level_from_env, setup_logging};
pub use schedule_url::build_schedule_url;
pub use template::substitute;
