// Each domain contains: mod.rs, resolvers.rs, types.rs and, where a
// mutation needs more than one store call, service.rs

pub mod automation;
pub mod courts;
pub mod players;
pub mod queue;
pub mod session;
pub mod teams;
