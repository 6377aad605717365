//! Emplacement trait: turning closures (and tuples of closures) into nodes.
//!
//! Rust lacks variadic functions, so [`crate::Scheduler::emplace`] and
//! [`crate::Scheduler::silent_emplace`] are generic over `Emplace`, which is
//! implemented for a single closure and for closure tuples of arity 0 through
//! 8. The returned handles are shaped positionally like the argument: one
//! closure yields one handle, a tuple yields a tuple.
//!
//! The trait carries a marker type parameter so the blanket closure
//! implementation and the tuple implementations stay coherent; callers never
//! name the marker, inference picks the only implementation whose bounds
//! hold.

use std::marker::PhantomData;

use crate::builder::TaskHandle;
use crate::output::TaskOutput;
use crate::scheduler::Scheduler;

/// Marker selecting the single-closure implementation.
pub struct Single<R>(PhantomData<R>);

/// Marker selecting a tuple implementation; `T` is the tuple of return types.
pub struct Bundle<T>(PhantomData<T>);

/// Anything that can be emplaced into a scheduler's current graph.
pub trait Emplace<M> {
    /// Shape of the `silent_emplace` return value.
    type Handles<'s>;
    /// Shape of the `emplace` return value: handles paired with channels.
    type Outputs<'s>;

    fn silent_emplace_into<'s>(self, flow: &'s Scheduler) -> Self::Handles<'s>;
    fn emplace_into<'s>(self, flow: &'s Scheduler) -> Self::Outputs<'s>;
}

impl<F, R> Emplace<Single<R>> for F
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    type Handles<'s> = TaskHandle<'s>;
    type Outputs<'s> = (TaskHandle<'s>, TaskOutput<R>);

    fn silent_emplace_into<'s>(self, flow: &'s Scheduler) -> TaskHandle<'s> {
        // Silent tasks discard the return value (and any panic payload).
        flow.push_silent(Box::new(move || {
            self();
        }))
    }

    fn emplace_into<'s>(self, flow: &'s Scheduler) -> (TaskHandle<'s>, TaskOutput<R>) {
        flow.push(self)
    }
}

/// Zero-arity emplacement is a no-op returning an empty tuple.
impl Emplace<Bundle<()>> for () {
    type Handles<'s> = ();
    type Outputs<'s> = ();

    fn silent_emplace_into<'s>(self, _flow: &'s Scheduler) -> Self::Handles<'s> {}
    fn emplace_into<'s>(self, _flow: &'s Scheduler) -> Self::Outputs<'s> {}
}

/// Expands to `TaskHandle` with the given lifetime while consuming one type
/// token, so tuple implementations can emit one handle per element.
macro_rules! handle_ty {
    ($life:lifetime, $R:ident) => { TaskHandle<$life> };
}

macro_rules! impl_emplace_tuple {
    ($($F:ident : $R:ident),+) => {
        impl<$($F, $R),+> Emplace<Bundle<($($R,)+)>> for ($($F,)+)
        where
            $($F: FnOnce() -> $R + Send + 'static, $R: Send + 'static,)+
        {
            type Handles<'s> = ($(handle_ty!('s, $R),)+);
            type Outputs<'s> = ($((TaskHandle<'s>, TaskOutput<$R>),)+);

            #[allow(non_snake_case)]
            fn silent_emplace_into<'s>(self, flow: &'s Scheduler) -> Self::Handles<'s> {
                let ($($F,)+) = self;
                ($(<$F as Emplace<Single<$R>>>::silent_emplace_into($F, flow),)+)
            }

            #[allow(non_snake_case)]
            fn emplace_into<'s>(self, flow: &'s Scheduler) -> Self::Outputs<'s> {
                let ($($F,)+) = self;
                ($(<$F as Emplace<Single<$R>>>::emplace_into($F, flow),)+)
            }
        }
    };
}

// One implementation per arity. Eight callables per call mirrors the usual
// tuple-trait ceiling; larger graphs chain further emplace calls.
impl_emplace_tuple!(F1:R1);
impl_emplace_tuple!(F1:R1, F2:R2);
impl_emplace_tuple!(F1:R1, F2:R2, F3:R3);
impl_emplace_tuple!(F1:R1, F2:R2, F3:R3, F4:R4);
impl_emplace_tuple!(F1:R1, F2:R2, F3:R3, F4:R4, F5:R5);
impl_emplace_tuple!(F1:R1, F2:R2, F3:R3, F4:R4, F5:R5, F6:R6);
impl_emplace_tuple!(F1:R1, F2:R2, F3:R3, F4:R4, F5:R5, F6:R6, F7:R7);
impl_emplace_tuple!(F1:R1, F2:R2, F3:R3, F4:R4, F5:R5, F6:R6, F7:R7, F8:R8);
