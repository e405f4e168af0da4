//! Handler-chain execution
//!
//! This module coordinates one invocation through an ordered list of
//! handlers: build the context from the call parts, run each applicable
//! handler in order, classify any fault it raises, and hand back the
//! context's response value.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::{
    context::ChainContext,
    error::{ChainError, ChainResult, HandlerFault},
    parts::CallParts,
    traits::{ChainHandler, ContextFactory},
};

use super::wrapper::{IdentityResultWrapper, ResultWrapper};

/// Executes an ordered handler chain against a single context.
///
/// The executor holds no mutable state across invocations; the handler
/// list is immutable and shared, so concurrent executions on separate
/// threads are safe as long as each uses its own context.
pub struct ChainExecutor<C: ChainContext> {
    /// Name of this chain, used in trace output
    name: String,

    /// Handlers in strict execution order
    handlers: Vec<Arc<dyn ChainHandler<C>>>,

    /// Builds the per-invocation context from call parts
    factory: ContextFactory<C>,
}

impl<C: ChainContext> ChainExecutor<C> {
    /// Create an executor over a fixed, ordered handler list
    pub fn new(
        name: impl Into<String>,
        handlers: Vec<Arc<dyn ChainHandler<C>>>,
        factory: impl Fn(&CallParts) -> ChainResult<C> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            handlers,
            factory: Arc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run the chain for one invocation.
    ///
    /// Returns `Ok(None)` without constructing a context when no handlers
    /// are wired in; that is not an error condition. Otherwise returns the
    /// context's response value, or the classified fault that aborted the
    /// chain.
    pub fn execute(&self, parts: &CallParts) -> ChainResult<Option<C::Response>> {
        debug!(
            "chain `{}` start execute main process with {} handlers",
            self.name,
            self.handlers.len()
        );

        if self.handlers.is_empty() {
            warn!(
                "there are no handlers wired into chain `{}`, please check",
                self.name
            );
            return Ok(None);
        }

        let source = parts.source();
        let timestamp = parts.timestamp();

        let mut ctx = match (self.factory)(parts) {
            Ok(ctx) => ctx,
            Err(e) => return Err(ChainError::Initialization(e.to_string())),
        };

        // Log the request once at chain start so problems can be traced back
        // to their input.
        debug!(
            "TS[{source}-{timestamp}] chain `{}` start work, request: {:?}",
            self.name,
            parts.first_arg()
        );

        let outcome = self.run_handlers(&mut ctx, parts);

        info!(
            "TS[{source}-{timestamp}] chain `{}` finished work, duration {} ms, context: {ctx:?}",
            self.name,
            parts.elapsed_ms()
        );

        outcome.map(|()| Some(ctx.into_response()))
    }

    /// Iterate the handlers in strict order, classifying faults as they occur
    fn run_handlers(&self, ctx: &mut C, parts: &CallParts) -> ChainResult<()> {
        let source = parts.source();
        let timestamp = parts.timestamp();

        for (index, handler) in self.handlers.iter().enumerate() {
            let name = handler.name();

            if !handler.supports(ctx) {
                debug!("TS[{source}-{timestamp}] handler `{name}#{index}` doesn't support");
                continue;
            }

            let outcome = handler.handle(ctx);

            // The timing trace fires whether the handler returned or faulted.
            debug!(
                "TS[{source}-{timestamp}] handler `{name}#{index}` finished work, duration {} ms, context: {ctx:?}",
                parts.elapsed_ms()
            );

            if let Err(fault) = outcome {
                self.on_fault(name, index, fault)?;
            }
        }

        Ok(())
    }

    /// Three-way fault classification: continue faults are swallowed,
    /// interrupts propagate unchanged, anything else becomes a generic
    /// chain failure carrying the original message.
    fn on_fault(&self, name: &str, index: usize, fault: HandlerFault) -> ChainResult<()> {
        match fault {
            HandlerFault::Continue(reason) => {
                debug!(
                    "handler `{name}#{index}` raised continue, moving on: {}",
                    reason.as_deref().unwrap_or("no reason given")
                );
                Ok(())
            }
            HandlerFault::Interrupt { status, message } => {
                Err(ChainError::Interrupted { status, message })
            }
            HandlerFault::Other(message) => Err(ChainError::Failed(message)),
        }
    }
}

/// Pairs an executor with a result wrapper.
///
/// The wrapper is a post-processing hook that sees either the computed
/// response or the captured chain error, together with the original call
/// parts, and may substitute the final response. The default identity
/// wrapper passes the response through untouched, so faults propagate
/// instead of a value.
pub struct ChainEngine<C: ChainContext> {
    executor: Arc<ChainExecutor<C>>,
    wrapper: Arc<dyn ResultWrapper<C::Response>>,
}

impl<C: ChainContext> ChainEngine<C> {
    /// Create an engine with the identity result wrapper
    pub fn new(executor: Arc<ChainExecutor<C>>) -> Self {
        Self {
            executor,
            wrapper: Arc::new(IdentityResultWrapper),
        }
    }

    /// Replace the result wrapper
    pub fn with_wrapper(mut self, wrapper: Arc<dyn ResultWrapper<C::Response>>) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Execute the chain and pass the outcome through the result wrapper
    pub fn invoke(&self, parts: &CallParts) -> ChainResult<Option<C::Response>> {
        match self.executor.execute(parts) {
            Ok(response) => Ok(self.wrapper.process(response, None, parts)),
            Err(error) => match self.wrapper.process(None, Some(&error), parts) {
                Some(recovered) => Ok(Some(recovered)),
                None => Err(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{json, Value as JsonValue};

    use super::*;
    use crate::core::context::VarContext;

    /// Test handler that records invocations and optionally faults
    struct ProbeHandler {
        name: &'static str,
        supported: bool,
        fault: Option<HandlerFault>,
        invocations: Arc<AtomicUsize>,
    }

    impl ProbeHandler {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                supported: true,
                fault: None,
                invocations: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn unsupported(mut self) -> Self {
            self.supported = false;
            self
        }

        fn with_fault(mut self, fault: HandlerFault) -> Self {
            self.fault = Some(fault);
            self
        }

        fn invocations(&self) -> Arc<AtomicUsize> {
            self.invocations.clone()
        }
    }

    impl ChainHandler<VarContext> for ProbeHandler {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, _ctx: &VarContext) -> bool {
            self.supported
        }

        fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
            self.invocations.fetch_add(1, Ordering::SeqCst);

            // Record execution order in the context
            let mut order: Vec<JsonValue> = ctx
                .get("order")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            order.push(json!(self.name));
            ctx.set("order", JsonValue::Array(order));

            match &self.fault {
                Some(fault) => Err(fault.clone()),
                None => Ok(()),
            }
        }
    }

    /// Handler that sets the response to a fixed value
    struct RespondProbe(&'static str);

    impl ChainHandler<VarContext> for RespondProbe {
        fn name(&self) -> &str {
            "respond_probe"
        }

        fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
            ctx.set_response(json!(self.0));
            Ok(())
        }
    }

    fn executor(handlers: Vec<Arc<dyn ChainHandler<VarContext>>>) -> ChainExecutor<VarContext> {
        ChainExecutor::new("test-chain", handlers, |parts| {
            Ok(VarContext::from_parts(parts))
        })
    }

    fn parts() -> CallParts {
        CallParts::new("test", vec![json!({"user": "alice"})])
    }

    #[test]
    fn test_empty_chain_returns_none_without_building_context() {
        let factory_calls = Arc::new(AtomicUsize::new(0));
        let calls = factory_calls.clone();

        let executor: ChainExecutor<VarContext> =
            ChainExecutor::new("empty", Vec::new(), move |parts| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(VarContext::from_parts(parts))
            });

        let result = executor.execute(&parts()).unwrap();

        assert!(result.is_none());
        assert_eq!(factory_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_initialization_failure_aborts_before_any_handler() {
        let probe = ProbeHandler::new("h0");
        let invocations = probe.invocations();

        let executor: ChainExecutor<VarContext> =
            ChainExecutor::new("broken", vec![Arc::new(probe)], |_parts| {
                Err(ChainError::Failed("no context for you".to_string()))
            });

        let err = executor.execute(&parts()).unwrap_err();

        assert!(matches!(err, ChainError::Initialization(_)));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsupported_handler_is_never_invoked() {
        let skipped = ProbeHandler::new("skipped").unsupported();
        let skipped_invocations = skipped.invocations();
        let ran = ProbeHandler::new("ran");
        let ran_invocations = ran.invocations();

        let executor = executor(vec![Arc::new(skipped), Arc::new(ran)]);
        executor.execute(&parts()).unwrap();

        assert_eq!(skipped_invocations.load(Ordering::SeqCst), 0);
        assert_eq!(ran_invocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handlers_run_in_supplied_order() {
        // Expose the recorded order as the response
        struct OrderResponder;
        impl ChainHandler<VarContext> for OrderResponder {
            fn name(&self) -> &str {
                "order_responder"
            }
            fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
                let order = ctx.get("order").cloned().unwrap_or(JsonValue::Null);
                ctx.set_response(order);
                Ok(())
            }
        }

        let executor = executor(vec![
            Arc::new(ProbeHandler::new("first")),
            Arc::new(ProbeHandler::new("second")),
            Arc::new(ProbeHandler::new("third")),
            Arc::new(OrderResponder),
        ]);

        let response = executor.execute(&parts()).unwrap().unwrap();
        assert_eq!(response, json!(["first", "second", "third"]));
    }

    #[test]
    fn test_continue_fault_does_not_stop_the_chain() {
        let faulting =
            ProbeHandler::new("faulting").with_fault(HandlerFault::continue_with("not for me"));

        let executor = executor(vec![Arc::new(faulting), Arc::new(RespondProbe("after"))]);
        let response = executor.execute(&parts()).unwrap();

        assert_eq!(response, Some(json!("after")));
    }

    #[test]
    fn test_interrupt_fault_propagates_unchanged_and_stops_the_chain() {
        let interrupting =
            ProbeHandler::new("interrupting").with_fault(HandlerFault::interrupt(418, "teapot"));
        let later = ProbeHandler::new("later");
        let later_invocations = later.invocations();

        let executor = executor(vec![Arc::new(interrupting), Arc::new(later)]);
        let err = executor.execute(&parts()).unwrap_err();

        match err {
            ChainError::Interrupted { status, message } => {
                assert_eq!(status, 418);
                assert_eq!(message, "teapot");
            }
            other => panic!("expected Interrupted, got {other:?}"),
        }
        assert_eq!(later_invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unclassified_fault_is_wrapped_with_original_message() {
        let failing =
            ProbeHandler::new("failing").with_fault(HandlerFault::other("attempt to divide by zero"));
        let later = ProbeHandler::new("later");
        let later_invocations = later.invocations();

        let executor = executor(vec![Arc::new(failing), Arc::new(later)]);
        let err = executor.execute(&parts()).unwrap_err();

        match err {
            ChainError::Failed(message) => assert_eq!(message, "attempt to divide by zero"),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(later_invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_only_supported_handler_mutates_counter() {
        struct CounterProbe {
            supported: bool,
            value: i64,
        }

        impl ChainHandler<VarContext> for CounterProbe {
            fn name(&self) -> &str {
                "counter_probe"
            }
            fn supports(&self, _ctx: &VarContext) -> bool {
                self.supported
            }
            fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
                let counter = ctx.get_i64("counter").unwrap_or(0) + self.value;
                ctx.set("counter", counter);
                ctx.set_response(json!({ "counter": counter }));
                Ok(())
            }
        }

        let executor = executor(vec![
            Arc::new(CounterProbe {
                supported: false,
                value: 100,
            }),
            Arc::new(CounterProbe {
                supported: true,
                value: 1,
            }),
            Arc::new(CounterProbe {
                supported: false,
                value: 100,
            }),
        ]);

        let response = executor.execute(&parts()).unwrap().unwrap();
        assert_eq!(response, json!({"counter": 1}));
    }

    #[test]
    fn test_engine_identity_wrapper_propagates_errors() {
        let interrupting =
            ProbeHandler::new("interrupting").with_fault(HandlerFault::interrupt(503, "later"));
        let engine = ChainEngine::new(Arc::new(executor(vec![Arc::new(interrupting)])));

        let err = engine.invoke(&parts()).unwrap_err();
        assert!(matches!(err, ChainError::Interrupted { status: 503, .. }));
    }

    #[test]
    fn test_engine_custom_wrapper_can_recover() {
        struct FallbackWrapper;
        impl ResultWrapper<JsonValue> for FallbackWrapper {
            fn process(
                &self,
                response: Option<JsonValue>,
                error: Option<&ChainError>,
                _parts: &CallParts,
            ) -> Option<JsonValue> {
                match error {
                    Some(e) => Some(json!({ "error": e.to_string() })),
                    None => response,
                }
            }
        }

        let failing = ProbeHandler::new("failing").with_fault(HandlerFault::other("boom"));
        let engine = ChainEngine::new(Arc::new(executor(vec![Arc::new(failing)])))
            .with_wrapper(Arc::new(FallbackWrapper));

        let response = engine.invoke(&parts()).unwrap().unwrap();
        assert_eq!(response, json!({"error": "Chain failed: boom"}));
    }
}
