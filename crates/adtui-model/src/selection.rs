// File: crates/adtui-model/src/selection.rs
// Summary: Range selection with optional interval constraints and batched listener events.
// Notes:
// - Without constraints a selection is exactly what was requested.
// - With constraints the request must overlap a selectable interval. The interval
//   (or its overlap with the request, when partial selection is allowed) becomes
//   the selection. Among overlapping intervals the one that also overlaps the
//   current selection wins; otherwise the last overlapping one scanned.
// - Moving to a different interval is reported as a new selection, not as an edit.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::aspect::{AspectModel, AspectObserver, Dependency};
use crate::duration::{ConfigurableDurationData, DurationDataModel, UNSPECIFIED_DURATION};
use crate::range::{Range, RangeAspect};
use crate::series::SeriesData;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionAspect {
    Selection,
}

/// Receives selection lifecycle events. Every method defaults to a no-op.
pub trait SelectionListener {
    fn selection_created(&self) {}
    fn selection_cleared(&self) {}
    /// A constrained request overlapped no selectable interval.
    fn selection_creation_failure(&self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Created,
    Cleared,
    CreationFailure,
}

impl SelectionEvent {
    fn dispatch(self, listener: &dyn SelectionListener) {
        match self {
            SelectionEvent::Created => listener.selection_created(),
            SelectionEvent::Cleared => listener.selection_cleared(),
            SelectionEvent::CreationFailure => listener.selection_creation_failure(),
        }
    }
}

/// Selection-relevant view of one interval entry.
#[derive(Clone, Copy, Debug)]
struct Span {
    duration_us: i64,
    selectable_when_max_duration: bool,
    partial: bool,
}

impl Span {
    fn of<E: ConfigurableDurationData>(data: &E) -> Self {
        Self {
            duration_us: data.duration_us(),
            selectable_when_max_duration: data.selectable_when_max_duration(),
            partial: data.can_select_partial_range(),
        }
    }

    fn is_unfinished(&self) -> bool { self.duration_us == UNSPECIFIED_DURATION }

    fn interval(&self, start: i64) -> Range {
        let end = if self.is_unfinished() { f64::MAX } else { start.saturating_add(self.duration_us) as f64 };
        Range::new(start as f64, end)
    }
}

/// Type-erased constraint so models over different payload types can be mixed.
trait Constraint {
    fn spans(&self, candidate: &Range) -> Vec<SeriesData<Span>>;
}

impl<E: ConfigurableDurationData + Clone> Constraint for DurationDataModel<E> {
    fn spans(&self, candidate: &Range) -> Vec<SeriesData<Span>> {
        self.series()
            .data_series()
            .borrow()
            .data_for_x_range(candidate)
            .into_iter()
            .map(|d| SeriesData::new(d.x, Span::of(&d.value)))
            .collect()
    }
}

pub struct SelectionModel {
    selection: Rc<Range>,
    // Last observed selection; only its emptiness matters.
    previous: Range,
    constraints: RefCell<Vec<Rc<dyn Constraint>>>,
    listeners: RefCell<Vec<Rc<dyn SelectionListener>>>,
    model: AspectModel<SelectionAspect>,
    _observer: AspectObserver,
    enabled: Cell<bool>,
    updating: Cell<bool>,
    event_to_fire: Cell<Option<SelectionEvent>>,
}

impl SelectionModel {
    pub fn new(selection: Rc<Range>) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<SelectionModel>| {
            let observer = AspectObserver::new();
            let this = this.clone();
            selection.add_dependency(&observer).on_change(RangeAspect::Range, move || {
                if let Some(model) = this.upgrade() {
                    model.selection_changed();
                }
            });
            Self {
                previous: selection.as_ref().clone(),
                selection,
                constraints: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
                model: AspectModel::new(),
                _observer: observer,
                enabled: Cell::new(true),
                updating: Cell::new(false),
                event_to_fire: Cell::new(None),
            }
        })
    }

    pub fn selection_range(&self) -> &Rc<Range> { &self.selection }

    pub fn aspect(&self) -> &AspectModel<SelectionAspect> { &self.model }

    pub fn add_dependency(&self, observer: &AspectObserver) -> Rc<Dependency<SelectionAspect>> {
        self.model.add_dependency(observer)
    }

    pub fn add_constraint<E>(&self, constraint: Rc<DurationDataModel<E>>)
    where
        E: ConfigurableDurationData + Clone + 'static,
    {
        self.constraints.borrow_mut().push(constraint);
    }

    pub fn constraint_count(&self) -> usize { self.constraints.borrow().len() }

    pub fn add_listener(&self, listener: Rc<dyn SelectionListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn remove_listener(&self, listener: &Rc<dyn SelectionListener>) {
        self.listeners
            .borrow_mut()
            .retain(|l| !std::ptr::addr_eq(Rc::as_ptr(l), Rc::as_ptr(listener)));
    }

    /// Disabling turns `set` and `clear` into no-ops; an existing selection is kept.
    pub fn set_selection_enabled(&self, enabled: bool) { self.enabled.set(enabled) }

    pub fn is_selection_enabled(&self) -> bool { self.enabled.get() }

    /// Hold listener events until [`SelectionModel::end_update`]; only the last one survives.
    pub fn begin_update(&self) { self.updating.set(true) }

    pub fn end_update(&self) {
        self.updating.set(false);
        if let Some(event) = self.event_to_fire.take() {
            self.fire(event);
        }
    }

    pub fn is_updating(&self) -> bool { self.updating.get() }

    pub fn set(&self, min: f64, max: f64) {
        if !self.enabled.get() {
            return;
        }
        let constraints: Vec<Rc<dyn Constraint>> = self.constraints.borrow().clone();
        if constraints.is_empty() {
            self.selection.set(min, max);
            return;
        }

        let candidate = Range::new(min, max);
        let mut found: Option<(Range, bool)> = None;
        'scan: for constraint in &constraints {
            for data in constraint.spans(&candidate) {
                let span = data.value;
                if span.is_unfinished() && !span.selectable_when_max_duration {
                    continue;
                }
                let interval = span.interval(data.x);
                if !interval.intersects(&candidate) {
                    continue;
                }
                let touches_current = interval.intersects(&self.selection);
                found = Some((interval, span.partial));
                if touches_current {
                    break 'scan;
                }
            }
        }

        let Some((interval, partial)) = found else {
            debug!(min, max, "no selectable interval under requested range");
            self.clear();
            self.fire(SelectionEvent::CreationFailure);
            return;
        };

        let target = if partial { interval.intersection(&candidate) } else { interval };
        if !target.is_same_as(&self.selection) {
            debug!(min = target.min(), max = target.max(), partial, "constrained selection");
            // Moving to another interval reads as a fresh selection to listeners.
            self.previous.clear();
            self.selection.set_from(&target);
        }
    }

    pub fn clear(&self) {
        if !self.enabled.get() {
            return;
        }
        self.selection.clear();
    }

    fn selection_changed(&self) {
        self.model.changed(SelectionAspect::Selection);
        let is_empty = self.selection.is_empty();
        let was_empty = self.previous.is_empty();
        if was_empty && !is_empty {
            self.fire(SelectionEvent::Created);
        } else if !was_empty && is_empty {
            self.fire(SelectionEvent::Cleared);
        }
        self.previous.set_from(&self.selection);
    }

    fn fire(&self, event: SelectionEvent) {
        if self.updating.get() {
            self.event_to_fire.set(Some(event));
            return;
        }
        let listeners: Vec<Rc<dyn SelectionListener>> = self.listeners.borrow().clone();
        for listener in &listeners {
            event.dispatch(listener.as_ref());
        }
    }
}
