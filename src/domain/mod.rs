// Domain layer: ticket model, session state machine and the ports the kiosk
// talks to. No IO here.

pub mod model;
pub mod ports;
pub mod session;
