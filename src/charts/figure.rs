//! A small typed model of the Plotly figure JSON the pages hand to plotly.js.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Values along one axis of a trace. `None` renders as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValues {
    Dates(Vec<NaiveDate>),
    Numbers(Vec<Option<f64>>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Dates(v) => v.len(),
            AxisValues::Numbers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plotly's `visible` attribute: `true`, or `"legendonly"` for hidden-but-toggleable traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    LegendOnly,
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::LegendOnly
        }
    }
}

impl Visibility {
    pub fn to_value(self) -> Value {
        match self {
            Visibility::Visible => Value::Bool(true),
            Visibility::LegendOnly => Value::String("legendonly".to_string()),
        }
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Visibility::Visible => serializer.serialize_bool(true),
            Visibility::LegendOnly => serializer.serialize_str("legendonly"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub mode: &'static str,
    pub x: AxisValues,
    pub y: AxisValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    pub visible: Visibility,
}

impl Trace {
    /// A `scatter` trace; `mode` picks lines, markers or both.
    pub fn scatter(name: &str, mode: &'static str, x: AxisValues, y: AxisValues) -> Self {
        Trace {
            kind: "scatter",
            name: name.to_string(),
            mode,
            x,
            y,
            text: None,
            hovertemplate: None,
            visible: Visibility::Visible,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisLayout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[NaiveDate; 2]>,
}

impl AxisLayout {
    pub fn titled(text: &str) -> Self {
        AxisLayout {
            title: text.into(),
            tickangle: None,
            range: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub label: String,
    pub method: &'static str,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showactive: Option<bool>,
    pub buttons: Vec<Button>,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updatemenus: Vec<UpdateMenu>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visibility_serializes_like_plotly() {
        assert_eq!(serde_json::to_value(Visibility::Visible).unwrap(), json!(true));
        assert_eq!(
            serde_json::to_value(Visibility::LegendOnly).unwrap(),
            json!("legendonly")
        );
        assert_eq!(Visibility::from(false).to_value(), json!("legendonly"));
    }

    #[test]
    fn test_trace_json_shape() {
        let trace = Trace::scatter(
            "Testland",
            "lines",
            AxisValues::Dates(vec![NaiveDate::from_ymd_opt(2021, 1, 31).unwrap()]),
            AxisValues::Numbers(vec![None]),
        );

        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "scatter",
                "name": "Testland",
                "mode": "lines",
                "x": ["2021-01-31"],
                "y": [null],
                "visible": true
            })
        );
    }
}
