use crate::ml::ModelSummary;
use crate::models::{OwnerPrediction, PredictionRequest};

const STYLE: &str = r#"
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 50px auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #2f6fb0;
            padding-bottom: 10px;
        }
        label { display: block; margin-top: 12px; }
        input[type=text] { width: 100%; padding: 6px; }
        .result { background: #eef5ff; padding: 15px; margin-top: 20px; border-radius: 4px; }
        .meta { color: #666; font-size: 0.9em; }
    </style>"#;

/// Escape text for inclusion in HTML content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>{style}
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

/// Landing page: dataset upload form and the live model's provenance
pub fn index_page(summary: &ModelSummary) -> String {
    let training = &summary.training;
    let body = format!(
        r#"<h1>Asset Owner Predictor</h1>
<p>Upload an asset inventory (CSV with <code>hostname, ip, location, operating_system,
system_owner, application_owner</code>) to retrain both owner models.</p>
<form action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".csv,text/csv">
    <button type="submit">Upload and train</button>
</form>
<p><a href="/predict">Predict owners for an asset</a></p>
<p class="meta">Model generation {generation}, trained on {rows} rows from {source}
at {trained_at}.</p>"#,
        generation = summary.generation,
        rows = training.n_rows,
        source = escape_html(&training.source),
        trained_at = training.trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    layout("Asset Owner Predictor", &body)
}

/// Prediction form, optionally followed by a result for the submitted record
pub fn predict_page(request: &PredictionRequest, prediction: Option<&OwnerPrediction>) -> String {
    let field = |name: &str, label: &str, value: &str| {
        format!(
            r#"    <label for="{name}">{label}</label>
    <input type="text" id="{name}" name="{name}" value="{value}">"#,
            name = name,
            label = label,
            value = escape_html(value),
        )
    };

    let result = prediction
        .map(|p| {
            format!(
                r#"<div class="result">
    <p><strong>System owner:</strong> {}</p>
    <p><strong>Application owner:</strong> {}</p>
</div>"#,
                escape_html(&p.system_owner),
                escape_html(&p.application_owner),
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Predict Owners</h1>
<form action="/predict" method="post">
{hostname}
{ip}
{location}
{os}
    <p><button type="submit">Predict</button></p>
</form>
{result}
<p><a href="/">Back</a></p>"#,
        hostname = field("hostname", "Hostname", &request.hostname),
        ip = field("ip", "IP address", &request.ip),
        location = field("location", "Location", &request.location),
        os = field("operating_system", "Operating system", &request.operating_system),
        result = result,
    );
    layout("Predict Owners", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Ops" & 'Dev'</b>"#),
            "&lt;b&gt;&quot;Ops&quot; &amp; &#x27;Dev&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_predict_page_without_result() {
        let html = predict_page(&PredictionRequest::default(), None);
        assert!(html.contains(r#"name="operating_system""#));
        assert!(!html.contains("System owner:"));
    }

    #[test]
    fn test_predict_page_escapes_prediction() {
        let request = PredictionRequest {
            hostname: "<web>".to_string(),
            ..Default::default()
        };
        let prediction = OwnerPrediction {
            system_owner: "Ops & Infra".to_string(),
            application_owner: "<script>".to_string(),
        };

        let html = predict_page(&request, Some(&prediction));
        assert!(html.contains("Ops &amp; Infra"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"value="&lt;web&gt;""#));
        assert!(!html.contains("<script>"));
    }
}
