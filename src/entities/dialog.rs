use serde::{Deserialize, Serialize};

use crate::entities::LocationsData;
use crate::error::{invalid_state_error, Error};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
enum Status {
    #[default]
    Closed,
    Loading {
        generation: u64,
    },
    Open {
        data: LocationsData,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationDialog {
    status: Status,
    next_generation: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationDialogState {
    pub visible: bool,
    pub loading: bool,
    pub data: Option<LocationsData>,
}

impl EstimationDialog {
    pub fn state(&self) -> EstimationDialogState {
        match &self.status {
            Status::Closed => EstimationDialogState {
                visible: false,
                loading: false,
                data: None,
            },
            Status::Loading { generation: _ } => EstimationDialogState {
                visible: false,
                loading: true,
                data: None,
            },
            Status::Open { data } => EstimationDialogState {
                visible: true,
                loading: false,
                data: Some(data.clone()),
            },
        }
    }

    pub fn data(&self) -> Option<&LocationsData> {
        match &self.status {
            Status::Open { data } => Some(data),
            _ => None,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn request(&mut self) -> Result<u64, Error> {
        match self.status {
            Status::Closed | Status::Open { data: _ } => {
                self.next_generation += 1;
                self.status = Status::Loading {
                    generation: self.next_generation,
                };
                Ok(self.next_generation)
            }
            Status::Loading { generation: _ } => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self, data))]
    pub fn succeed(&mut self, token: u64, data: LocationsData) -> Result<(), Error> {
        match self.status {
            Status::Loading { generation } if generation == token => {
                self.status = Status::Open { data };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn fail(&mut self, token: u64) -> Result<(), Error> {
        match self.status {
            Status::Loading { generation } if generation == token => {
                self.status = Status::Closed;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// Closes the dialog from any state. A pending request is abandoned and
    /// its late result will be rejected.
    #[tracing::instrument(skip(self))]
    pub fn hide(&mut self) {
        self.status = Status::Closed;
    }
}

#[cfg(test)]
fn sample_data(price: f64) -> LocationsData {
    LocationsData {
        locations_data: vec![],
        price,
    }
}

#[test]
fn request_success_hide() {
    let mut dialog = EstimationDialog::default();
    assert_eq!(dialog.status, Status::Closed);

    let token = dialog.request().unwrap();
    assert!(dialog.state().loading);
    assert!(!dialog.state().visible);

    dialog.succeed(token, sample_data(3.0)).unwrap();
    let state = dialog.state();
    assert!(state.visible);
    assert!(!state.loading);
    assert_eq!(state.data.unwrap().price, 3.0);

    dialog.hide();
    assert_eq!(dialog.state().data, None);
    assert!(!dialog.state().visible);
}

#[test]
fn failure_clears_loading_and_stays_closed() {
    let mut dialog = EstimationDialog::default();

    let token = dialog.request().unwrap();
    dialog.fail(token).unwrap();

    let state = dialog.state();
    assert!(!state.loading);
    assert!(!state.visible);
    assert_eq!(dialog.status, Status::Closed);
}

#[test]
fn open_dialog_can_be_requested_again() {
    let mut dialog = EstimationDialog::default();

    let token = dialog.request().unwrap();
    dialog.succeed(token, sample_data(1.0)).unwrap();

    let token = dialog.request().unwrap();
    assert!(dialog.state().loading);
    assert_eq!(dialog.data(), None);

    dialog.succeed(token, sample_data(2.0)).unwrap();
    assert_eq!(dialog.data().unwrap().price, 2.0);
}

#[test]
fn second_request_while_loading_is_rejected() {
    let mut dialog = EstimationDialog::default();

    dialog.request().unwrap();

    assert_eq!(dialog.request(), Err(invalid_state_error()));
}

#[test]
fn result_after_hide_is_stale() {
    let mut dialog = EstimationDialog::default();

    let token = dialog.request().unwrap();
    dialog.hide();

    assert!(dialog.succeed(token, sample_data(1.0)).is_err());
    assert_eq!(dialog.status, Status::Closed);

    let next = dialog.request().unwrap();
    assert!(dialog.succeed(token, sample_data(1.0)).is_err());
    assert!(dialog.succeed(next, sample_data(1.0)).is_ok());
}
