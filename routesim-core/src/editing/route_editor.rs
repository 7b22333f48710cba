use crate::model::RouteStops;
use crate::{Error, LineId};

/// Provisional stop list collected while a line is being re-routed
#[derive(Debug, Clone, Default)]
pub struct RouteEditor {
    line: Option<LineId>,
    provisional: Vec<String>,
}

impl RouteEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters edit mode for `line`, dropping anything collected before
    pub fn begin(&mut self, line: LineId) {
        self.line = Some(line);
        self.provisional.clear();
    }

    /// Appends a stop unless it is already in the list.
    /// Returns whether the stop was appended.
    pub fn add_stop(&mut self, name: &str) -> bool {
        if self.line.is_none() || self.provisional.iter().any(|stop| stop == name) {
            return false;
        }
        self.provisional.push(name.to_string());
        true
    }

    /// Leaves edit mode and turns the collected stops into a route
    ///
    /// # Errors
    ///
    /// [`Error::NotEditing`] outside edit mode, [`Error::InvalidRoute`]
    /// for fewer than two stops. Edit mode is left in both cases.
    pub fn commit(&mut self) -> Result<(LineId, RouteStops), Error> {
        let line = self.line.take().ok_or(Error::NotEditing)?;
        let stops = std::mem::take(&mut self.provisional);
        let route = RouteStops::from_sequence(&stops)?;
        Ok((line, route))
    }

    pub fn cancel(&mut self) {
        self.line = None;
        self.provisional.clear();
    }

    pub fn is_active(&self) -> bool {
        self.line.is_some()
    }

    /// Line being edited
    pub fn line(&self) -> Option<LineId> {
        self.line
    }

    pub fn provisional(&self) -> &[String] {
        &self.provisional
    }
}
