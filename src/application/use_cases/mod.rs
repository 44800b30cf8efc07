mod compile_plan;

pub use compile_plan::{CompilePlanUseCase, CompiledPlan};
