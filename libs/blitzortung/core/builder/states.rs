/// Type-state markers for the builder pattern
///
/// A FeedClient cannot be built before a strike handler is set; these types
/// track that at compile time.

/// Marker trait for handler state
pub trait HandlerState {}

/// Handler has not been set
pub struct NoHandler;
impl HandlerState for NoHandler {}

/// Handler has been set
pub struct HasHandler;
impl HandlerState for HasHandler {}
