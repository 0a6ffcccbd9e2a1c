//! # benison-server
//!
//! HTTP front end of the blessing exchange.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET\|POST /auth/bless` | Exchange an access token for a blessing |
//! | `GET /blessing-root` | Signer blessing names and public key |
//! | `GET /stats/blessings` | Issuance counters |
//! | `GET /healthz` | Liveness |

pub mod error;
pub mod handlers;
pub mod idp;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use idp::TokenInfoProvider;
pub use routes::create_router;
pub use state::{AppState, StateError};
