// Telemetry sample domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Drone,
    Soil,
}

/// Static display metadata for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Altitude,
    Speed,
    Battery,
    Temperature,
    Nitrogen,
    Phosphorus,
    Potassium,
    OrganicMatter,
    Ph,
    Moisture,
    Conductivity,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Altitude,
        Metric::Speed,
        Metric::Battery,
        Metric::Temperature,
        Metric::Nitrogen,
        Metric::Phosphorus,
        Metric::Potassium,
        Metric::OrganicMatter,
        Metric::Ph,
        Metric::Moisture,
        Metric::Conductivity,
    ];

    pub fn descriptor(self) -> MetricDescriptor {
        let (key, name, unit, category) = match self {
            Metric::Altitude => ("altitude", "Altitude", "m", Category::Drone),
            Metric::Speed => ("speed", "Speed", "m/s", Category::Drone),
            Metric::Battery => ("battery", "Battery", "%", Category::Drone),
            Metric::Temperature => ("temperature", "Temperature", "°C", Category::Drone),
            Metric::Nitrogen => ("nitrogen", "Nitrogen", "mg/kg", Category::Soil),
            Metric::Phosphorus => ("phosphorus", "Phosphorus", "mg/kg", Category::Soil),
            Metric::Potassium => ("potassium", "Potassium", "mg/kg", Category::Soil),
            Metric::OrganicMatter => ("organic_matter", "Organic Matter", "%", Category::Soil),
            Metric::Ph => ("ph", "pH", "pH", Category::Soil),
            Metric::Moisture => ("moisture", "Soil Moisture", "%", Category::Soil),
            Metric::Conductivity => ("conductivity", "Electrical Conductivity", "mS/cm", Category::Soil),
        };
        MetricDescriptor {
            key,
            name,
            unit,
            category,
        }
    }
}

/// One telemetry observation: drone flight metrics plus soil readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub altitude: f64,
    pub speed: f64,
    pub battery: f64,
    pub temperature: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub organic_matter: f64,
    pub ph: f64,
    pub moisture: f64,
    pub conductivity: f64,
}

impl Sample {
    /// A sample with every metric at zero.
    pub fn zeroed(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            altitude: 0.0,
            speed: 0.0,
            battery: 0.0,
            temperature: 0.0,
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            organic_matter: 0.0,
            ph: 0.0,
            moisture: 0.0,
            conductivity: 0.0,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Altitude => self.altitude,
            Metric::Speed => self.speed,
            Metric::Battery => self.battery,
            Metric::Temperature => self.temperature,
            Metric::Nitrogen => self.nitrogen,
            Metric::Phosphorus => self.phosphorus,
            Metric::Potassium => self.potassium,
            Metric::OrganicMatter => self.organic_matter,
            Metric::Ph => self.ph,
            Metric::Moisture => self.moisture,
            Metric::Conductivity => self.conductivity,
        }
    }

    pub fn set_value(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Altitude => &mut self.altitude,
            Metric::Speed => &mut self.speed,
            Metric::Battery => &mut self.battery,
            Metric::Temperature => &mut self.temperature,
            Metric::Nitrogen => &mut self.nitrogen,
            Metric::Phosphorus => &mut self.phosphorus,
            Metric::Potassium => &mut self.potassium,
            Metric::OrganicMatter => &mut self.organic_matter,
            Metric::Ph => &mut self.ph,
            Metric::Moisture => &mut self.moisture,
            Metric::Conductivity => &mut self.conductivity,
        };
        *slot = value;
    }

    pub fn with_value(mut self, metric: Metric, value: f64) -> Self {
        self.set_value(metric, value);
        self
    }
}
