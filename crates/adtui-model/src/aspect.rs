// File: crates/adtui-model/src/aspect.rs
// Summary: Aspect-scoped change notification. Models hold dependencies weakly; observers own them.
// Notes:
// - A dependency lives exactly as long as the observer that created it. Dropping or
//   disposing the observer silently unregisters everything it registered.
// - Fan-out iterates a snapshot of the registry, so callbacks may add or remove
//   dependencies (or fire further changes) while a notification is in flight.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Tag type naming one category of change. Usually a small fieldless enum per domain.
pub trait Aspect: Copy + Eq + Hash + 'static {}

impl<T: Copy + Eq + Hash + 'static> Aspect for T {}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

type Callback = Rc<dyn Fn()>;

/// Per-observer bundle of aspect -> callback registrations.
pub struct Dependency<T: Aspect> {
    owner: u64,
    callbacks: RefCell<HashMap<T, Vec<Callback>>>,
}

impl<T: Aspect> Dependency<T> {
    /// Register `callback` for `aspect`. Returns `self` so registrations can be chained.
    /// Registering the same closure twice makes it fire twice.
    pub fn on_change(&self, aspect: T, callback: impl Fn() + 'static) -> &Self {
        self.callbacks
            .borrow_mut()
            .entry(aspect)
            .or_default()
            .push(Rc::new(callback));
        self
    }

    /// Number of callbacks registered for `aspect`.
    pub fn callback_count(&self, aspect: T) -> usize {
        self.callbacks.borrow().get(&aspect).map_or(0, Vec::len)
    }

    fn fire(&self, aspect: T) {
        // Clone the handles so a callback may register more callbacks on this dependency.
        let snapshot: Vec<Callback> = match self.callbacks.borrow().get(&aspect) {
            Some(list) => list.clone(),
            None => return,
        };
        for callback in snapshot {
            callback();
        }
    }
}

impl<T: Aspect + fmt::Debug> fmt::Debug for Dependency<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aspects: Vec<T> = self.callbacks.borrow().keys().copied().collect();
        f.debug_struct("Dependency")
            .field("owner", &self.owner)
            .field("aspects", &aspects)
            .finish()
    }
}

struct OwnedDependency {
    model: u64,
    // Type-erased `Rc<Dependency<T>>`; holding it is what keeps the registration alive.
    _dependency: Rc<dyn Any>,
}

/// Owner of the dependencies created on its behalf by any number of models.
///
/// Drop (or [`AspectObserver::dispose`]) releases them all, after which none of the
/// observer's callbacks can fire again.
pub struct AspectObserver {
    id: u64,
    dependencies: RefCell<Vec<OwnedDependency>>,
}

impl AspectObserver {
    pub fn new() -> Self {
        Self { id: next_id(), dependencies: RefCell::new(Vec::new()) }
    }

    /// Release every dependency this observer owns, in every model.
    pub fn dispose(&self) {
        let released = std::mem::take(&mut *self.dependencies.borrow_mut());
        // Dropped outside the borrow: callback captures may run arbitrary drop glue.
        drop(released);
    }

    /// Number of dependencies currently owned.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.borrow().len()
    }

    fn adopt(&self, model: u64, dependency: Rc<dyn Any>) {
        self.dependencies
            .borrow_mut()
            .push(OwnedDependency { model, _dependency: dependency });
    }

    fn release_model(&self, model: u64) {
        let released: Vec<OwnedDependency> = {
            let mut deps = self.dependencies.borrow_mut();
            let (gone, kept): (Vec<_>, Vec<_>) = deps.drain(..).partition(|d| d.model == model);
            *deps = kept;
            gone
        };
        drop(released);
    }
}

impl Default for AspectObserver {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for AspectObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectObserver")
            .field("id", &self.id)
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}

/// Publisher side: fires aspect changes to every live dependency.
pub struct AspectModel<T: Aspect> {
    id: u64,
    dependencies: RefCell<Vec<Weak<Dependency<T>>>>,
}

impl<T: Aspect> AspectModel<T> {
    pub fn new() -> Self {
        Self { id: next_id(), dependencies: RefCell::new(Vec::new()) }
    }

    /// Create a dependency owned by `observer` and tracked weakly by this model.
    ///
    /// The returned handle is only needed to chain [`Dependency::on_change`]; the
    /// observer keeps the dependency alive.
    pub fn add_dependency(&self, observer: &AspectObserver) -> Rc<Dependency<T>> {
        let dependency = Rc::new(Dependency { owner: observer.id, callbacks: RefCell::new(HashMap::new()) });
        self.dependencies.borrow_mut().push(Rc::downgrade(&dependency));
        observer.adopt(self.id, dependency.clone());
        dependency
    }

    /// Drop every dependency `observer` registered on this model.
    pub fn remove_dependencies(&self, observer: &AspectObserver) {
        self.dependencies
            .borrow_mut()
            .retain(|weak| weak.upgrade().is_some_and(|d| d.owner != observer.id));
        observer.release_model(self.id);
    }

    /// Notify every live dependency that `aspect` changed.
    ///
    /// Every dependency alive when the fan-out starts is notified, even if its
    /// observer is released by an earlier callback. A panicking callback aborts the
    /// remaining fan-out and propagates to the caller.
    pub fn changed(&self, aspect: T) {
        let snapshot: Vec<Rc<Dependency<T>>> = {
            let mut deps = self.dependencies.borrow_mut();
            deps.retain(|weak| weak.strong_count() > 0);
            deps.iter().filter_map(Weak::upgrade).collect()
        };
        for dependency in snapshot {
            dependency.fire(aspect);
        }
    }

    /// Number of registrations whose owner is still alive.
    pub fn dependency_count(&self) -> usize {
        self.dependencies
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<T: Aspect> Default for AspectModel<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Aspect> fmt::Debug for AspectModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectModel")
            .field("id", &self.id)
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}
