pub mod session_gate;

pub use session_gate::{
    clear_session_cookies, decide, session_gate, store_session_cookies, GateDecision,
    ACCESS_TOKEN_COOKIE, HOME_PATH, LOGIN_PATH, REFRESH_TOKEN_COOKIE,
};
