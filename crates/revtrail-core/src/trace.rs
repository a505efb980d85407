//! Bootstrap tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect what
//! gets generated.

///
/// BootTraceSink
///

pub trait BootTraceSink: Send + Sync {
    fn on_event(&self, event: BootTraceEvent<'_>);
}

///
/// BootTracePass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BootTracePass {
    First,
    Second,
}

///
/// BootTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BootTraceEvent<'a> {
    PassStart {
        pass: BootTracePass,
        entity: &'a str,
    },
    PassFinish {
        pass: BootTracePass,
        entity: &'a str,
    },
    AuditEntityRegistered {
        entity: &'a str,
        audit_entity: &'a str,
    },
    MiddleEntityRegistered {
        owner: &'a str,
        property: &'a str,
        audit_middle_entity: &'a str,
    },
    NotAuditedTargetIgnored {
        entity: &'a str,
        property: &'a str,
        referenced_entity: &'a str,
    },
}

///
/// BootTrace
///
/// A no-allocation wrapper around the optional sink so generator code never
/// branches on presence at call sites.
///

#[derive(Clone, Copy)]
pub struct BootTrace<'a> {
    sink: Option<&'a dyn BootTraceSink>,
}

impl<'a> BootTrace<'a> {
    #[must_use]
    pub const fn new(sink: Option<&'a dyn BootTraceSink>) -> Self {
        Self { sink }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn emit(&self, event: BootTraceEvent<'_>) {
        if let Some(sink) = self.sink {
            sink.on_event(event);
        }
    }
}
