pub mod host;
pub mod live;
pub mod props;
pub mod resolver;
pub mod route;
pub mod scroll;
pub mod session;
pub mod timers;
pub mod watch;

pub use host::{CompletionFuture, CompletionPredicate, CustomResolver, Dom, Navigator, TourHooks};
pub use props::{CardPosition, CardProps, OverlayFrame, PointerProps, TourChromeProps};
pub use resolver::TargetResolver;
pub use session::TourSession;
pub use timers::{TimerHandle, TimerKind, TimerQueue};
