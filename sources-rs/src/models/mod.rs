pub(crate) mod connection;
pub(crate) mod shutdown;
pub(crate) mod subscriptions;
