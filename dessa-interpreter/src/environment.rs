use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Debug)]
pub struct EnvironmentCore {
    store: HashMap<Rc<str>, Rc<Object>>,
    outer: Option<WeakEnvironment>,
}

/// Handle to a scope frame. Clones share the frame.
#[derive(Debug, Clone)]
pub struct Environment {
    environment: Rc<RefCell<EnvironmentCore>>,
}

/// Non-owning handle to a scope frame.
///
/// Frames point at their enclosing frame, and closures at their defining
/// frame, through this handle. Whoever needs a frame to outlive the call
/// that created it keeps a strong [`Environment`] instead.
#[derive(Debug, Clone)]
pub struct WeakEnvironment {
    environment: Weak<RefCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            environment: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: WeakEnvironment) -> Environment {
        Environment {
            environment: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer),
            })),
        }
    }

    pub fn downgrade(&self) -> WeakEnvironment {
        WeakEnvironment {
            environment: Rc::downgrade(&self.environment),
        }
    }

    /// Looks `key` up in this frame, then in each enclosing one that is
    /// still alive.
    pub fn get(&self, key: &str) -> Option<Rc<Object>> {
        let env = self.environment.borrow();
        match env.store.get(key) {
            Some(value) => Some(value.clone()),
            None => env
                .outer
                .as_ref()
                .and_then(WeakEnvironment::upgrade)
                .and_then(|outer| outer.get(key)),
        }
    }

    /// Binds in this frame only, shadowing any outer binding.
    pub fn set(&mut self, key: Rc<str>, value: Rc<Object>) {
        self.environment.borrow_mut().store.insert(key, value);
    }
}

impl WeakEnvironment {
    pub fn upgrade(&self) -> Option<Environment> {
        self.environment
            .upgrade()
            .map(|environment| Environment { environment })
    }

    pub fn ptr_eq(&self, other: &WeakEnvironment) -> bool {
        self.environment.ptr_eq(&other.environment)
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.environment, &other.environment)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
