// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod chart;

use slint::Model;

use hive_monitor_common::{
    History, MockSensorController, SensorControllerPointer, SensorControllerSharedPointer,
    SensorReading, HISTORY_LEN,
};

/// Our App struct that holds the UI, the sensor controller and the history.
/// It also holds a timer that samples the sensor every 5 seconds.
///
/// The App struct is responsible for initializing the UI and seeding the
/// history with a synthesized past 24 hours. On every timer tick a fresh
/// reading becomes the current one, the history window slides forward and the
/// chart paths are recomputed.
///
/// The timer is owned by the App and stops when the App is dropped, so no
/// tick outlives the window.
struct App {
    ui: AppWindow,
    sensor_controller: SensorControllerSharedPointer,
    history: std::rc::Rc<std::cell::RefCell<History>>,
    timer: slint::Timer,
    records: std::rc::Rc<slint::VecModel<ReadingRecord>>,
}

impl App {
    const TIMER_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

    /// Create a new App struct.
    ///
    /// Builds the window, seeds the history and pushes the initial state into
    /// the view model. The UI shows its loading message until this is done.
    fn new() -> anyhow::Result<Self> {
        // Make a new AppWindow
        let ui = AppWindow::new()?;

        // Create a shared sensor controller. Everything behind the trait is a
        // mock; a real probe would slot in behind the same seam.
        use std::sync::{Arc, Mutex};
        let data_controller: SensorControllerPointer = Box::new(MockSensorController::new()?);
        let sensor_controller = Arc::new(Mutex::new(data_controller));

        // Seed the rolling window with a synthesized past 24 hours.
        let history = History::seed(
            sensor_controller
                .lock()
                .unwrap()
                .as_mut(),
            HISTORY_LEN,
        )
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        // Create a shared model mirroring the history for the UI.
        let records: std::rc::Rc<slint::VecModel<ReadingRecord>> = std::rc::Rc::new(
            slint::VecModel::from(
                history
                    .readings()
                    .iter()
                    .map(ReadingRecord::from)
                    .collect::<Vec<_>>(),
            ),
        );

        // Initialize the view model with the records.
        let model = slint::ModelRc::from(records.clone());
        ui.global::<ViewModel>().set_records(model);

        // Show the newest seeded reading and the chart, then lift the loading guard.
        if let Some(latest) = history.latest() {
            apply_current(&ui, latest);
        }
        apply_chart(&ui, history.readings());
        ui.global::<ViewModel>().set_have_data(true);

        // Return the App struct
        Ok(Self {
            ui,
            sensor_controller,
            history: std::rc::Rc::new(std::cell::RefCell::new(history)),
            timer: slint::Timer::default(),
            records,
        })
    }

    /// Run the App, start the timer and sample the sensor periodically.
    fn run(&mut self) -> anyhow::Result<()> {
        // Get the handle to the UI as a weak reference.
        let ui_handle = self.ui.as_weak();

        // Get the controller, history and records, because we need to access
        // them in the timer closure.
        let sensor_controller = self.sensor_controller.clone();
        let history = self.history.clone();
        let records = self.records.clone();

        // Start the timer with a 5 second interval.
        self.timer.start(
            slint::TimerMode::Repeated,
            Self::TIMER_INTERVAL,
            move || {
                let ui = ui_handle.unwrap();

                // Sample the current sensor data from the controller.
                let reading = match sensor_controller.lock().unwrap().current_data() {
                    Ok(reading) => reading,
                    Err(e) => {
                        log::error!("Sampling sensor data failed: {e}");
                        return;
                    }
                };

                log::debug!(
                    "Tick: {:.1}°C, {:.1}%, soil {:.1}%, {} ppm",
                    reading.temperature_celsius,
                    reading.humidity_percent,
                    reading.soil_moisture_percent,
                    reading.co2_ppm
                );

                // Slide the history window and mirror it into the view model.
                let mut history = history.borrow_mut();
                history.advance(reading.clone());
                if records.row_count() > 0 {
                    records.remove(0);
                }
                records.push(ReadingRecord::from(&reading));

                apply_current(&ui, &reading);
                apply_chart(&ui, history.readings());
            },
        );

        // Run the UI (and map an error to an anyhow::Error).
        self.ui.run().map_err(|e| e.into())
    }
}

/// Set the current reading and its formatted card labels in the view model.
fn apply_current(ui: &AppWindow, reading: &SensorReading) {
    let model = ui.global::<ViewModel>();

    model.set_current(ReadingRecord::from(reading));
    model.set_temperature_label(slint::format!("{:.1} °C", reading.temperature_celsius));
    model.set_humidity_label(slint::format!("{:.1} %", reading.humidity_percent));
    model.set_soil_moisture_label(slint::format!("{:.1} %", reading.soil_moisture_percent));
    model.set_co2_label(slint::format!("{} ppm", reading.co2_ppm));
}

/// Recompute the chart path commands and axis labels from the history window.
fn apply_chart(ui: &AppWindow, readings: &[SensorReading]) {
    let paths = chart::chart_paths(readings);
    let model = ui.global::<ViewModel>();

    model.set_temperature_path(paths.temperature.into());
    model.set_humidity_path(paths.humidity.into());
    model.set_soil_moisture_path(paths.soil_moisture.into());
    model.set_co2_path(paths.co2.into());
    model.set_axis_min_label(slint::format!("{:.0}", paths.axis_min));
    model.set_axis_max_label(slint::format!("{:.0}", paths.axis_max));
}

/// Convert a sensor reading into a view model record.
impl From<&SensorReading> for ReadingRecord {
    fn from(reading: &SensorReading) -> Self {
        Self {
            temperature: reading.temperature_celsius as f32,
            humidity: reading.humidity_percent as f32,
            soil_moisture: reading.soil_moisture_percent as f32,
            co2: reading.co2_ppm,
            timestamp: slint::SharedString::from(reading.time_label()),
        }
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new()?;

    app.run()
}
