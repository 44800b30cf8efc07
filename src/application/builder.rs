use crate::application::ports::QueryTarget;
use crate::domain::condition::Condition;

/// Anything that knows how to apply itself to a [`QueryTarget`].
pub trait Builder {
    fn build<T: QueryTarget>(&self, target: T) -> T;
}

impl Builder for Condition {
    fn build<T: QueryTarget>(&self, target: T) -> T {
        if self.is_empty() {
            return target;
        }
        target.filter(self)
    }
}

/// `None` is the no-op builder: the target comes back untouched.
impl<B: Builder> Builder for Option<B> {
    fn build<T: QueryTarget>(&self, target: T) -> T {
        match self {
            Some(builder) => builder.build(target),
            None => target,
        }
    }
}

impl<B: Builder> Builder for [B] {
    fn build<T: QueryTarget>(&self, target: T) -> T {
        self.iter().fold(target, |target, builder| builder.build(target))
    }
}
