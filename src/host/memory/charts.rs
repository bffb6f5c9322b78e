use std::cell::RefCell;
use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{Layout, Trace};
use crate::error::{EnhanceError, EnhanceResult};
use crate::host::{ChartLibrary, PlotOptions};

use super::NodeId;

/// One accepted `render` submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub container: NodeId,
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub options: Option<PlotOptions>,
}

#[derive(Debug, Clone)]
struct RenderedChart {
    data: Vec<Trace>,
    layout: Option<Layout>,
}

#[derive(Debug, Default)]
struct LibraryState {
    charts: IndexMap<NodeId, RenderedChart>,
    renders: Vec<RenderCall>,
    destroyed: Vec<NodeId>,
    failing: HashSet<NodeId>,
}

/// Charting library stand-in that remembers what each container shows.
#[derive(Debug, Default)]
pub struct MemoryChartLibrary {
    state: RefCell<LibraryState>,
}

impl MemoryChartLibrary {
    /// Puts a chart into `container` as if the library had rendered it on its
    /// own. Not recorded as a render call.
    pub fn seed(&self, container: NodeId, data: Vec<Trace>, layout: Layout) {
        self.state
            .borrow_mut()
            .charts
            .insert(
                container,
                RenderedChart {
                    data,
                    layout: Some(layout),
                },
            );
    }

    /// Like [`seed`](Self::seed) for a chart whose layout cannot be read.
    pub fn seed_without_layout(&self, container: NodeId, data: Vec<Trace>) {
        self.state
            .borrow_mut()
            .charts
            .insert(container, RenderedChart { data, layout: None });
    }

    /// Makes every later `render` into `container` fail.
    pub fn fail_renders_for(&self, container: NodeId) {
        self.state.borrow_mut().failing.insert(container);
    }

    #[must_use]
    pub fn is_rendered(&self, container: NodeId) -> bool {
        self.state.borrow().charts.contains_key(&container)
    }

    #[must_use]
    pub fn render_calls(&self) -> Vec<RenderCall> {
        self.state.borrow().renders.clone()
    }

    #[must_use]
    pub fn render_count_for(&self, container: NodeId) -> usize {
        self.state
            .borrow()
            .renders
            .iter()
            .filter(|call| call.container == container)
            .count()
    }

    #[must_use]
    pub fn destroyed(&self) -> Vec<NodeId> {
        self.state.borrow().destroyed.clone()
    }
}

impl ChartLibrary<NodeId> for MemoryChartLibrary {
    fn data(&self, container: &NodeId) -> Option<Vec<Trace>> {
        self.state
            .borrow()
            .charts
            .get(container)
            .map(|chart| chart.data.clone())
    }

    fn layout(&self, container: &NodeId) -> Option<Layout> {
        self.state
            .borrow()
            .charts
            .get(container)
            .and_then(|chart| chart.layout.clone())
    }

    fn render(
        &self,
        container: &NodeId,
        data: &[Trace],
        layout: &Layout,
        options: Option<&PlotOptions>,
    ) -> EnhanceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.contains(container) {
            return Err(EnhanceError::Render(format!(
                "chart in {container:?} is not initialized"
            )));
        }
        trace!(?container, traces = data.len(), "memory render");
        state.charts.insert(
            *container,
            RenderedChart {
                data: data.to_vec(),
                layout: Some(layout.clone()),
            },
        );
        state.renders.push(RenderCall {
            container: *container,
            data: data.to_vec(),
            layout: layout.clone(),
            options: options.cloned(),
        });
        Ok(())
    }

    fn restyle_colors(&self, container: &NodeId, data: &[Trace]) -> EnhanceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.contains(container) {
            return Err(EnhanceError::Render(format!(
                "chart in {container:?} is not initialized"
            )));
        }
        let Some(chart) = state.charts.get_mut(container) else {
            return Err(EnhanceError::Render(format!("no chart in {container:?}")));
        };
        if chart.data.len() != data.len() {
            return Err(EnhanceError::Render(format!(
                "chart in {container:?} has {} traces, got {}",
                chart.data.len(),
                data.len()
            )));
        }
        chart.data = chart
            .data
            .iter()
            .zip(data)
            .map(|(current, colors)| current.with_colors_from(colors))
            .collect();
        let call = RenderCall {
            container: *container,
            data: chart.data.clone(),
            layout: chart.layout.clone().unwrap_or_default(),
            options: None,
        };
        trace!(?container, traces = data.len(), "memory restyle");
        state.renders.push(call);
        Ok(())
    }

    fn destroy(&self, container: &NodeId) {
        let mut state = self.state.borrow_mut();
        state.charts.shift_remove(container);
        state.destroyed.push(*container);
    }
}
