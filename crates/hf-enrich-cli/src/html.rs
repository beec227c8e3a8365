use hf_enrich_core::snapshot::Snapshot;

/// Render a snapshot as a single self-contained HTML page: the data is
/// embedded as JSON and the table rows are built client-side, so the
/// file can be dropped on any static host as-is.
pub fn render(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    // "</" would terminate the script element early if it ever showed
    // up inside a string field.
    let data = serde_json::to_string(snapshot)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Model Offerings - Enriched</title>
    <meta charset="UTF-8">
    <style>
        body {{
            font-family: monospace;
            margin: 20px;
        }}
        table {{
            border-collapse: collapse;
            width: 100%;
        }}
        th, td {{
            border: 1px solid #000;
            padding: 4px 8px;
            text-align: left;
        }}
        th {{
            background: #f0f0f0;
            font-weight: bold;
        }}
        tr:hover {{
            background: #f9f9f9;
        }}
        .generated {{
            color: #666;
            margin-bottom: 12px;
        }}
    </style>
</head>
<body>
    <div class="generated" id="generated"></div>
    <table id="modelsTable">
        <thead>
            <tr>
                <th>Model</th>
                <th>Provider</th>
                <th>Status</th>
                <th>Uptime %</th>
                <th>Input $/1M</th>
                <th>Output $/1M</th>
                <th>Context</th>
                <th>Quant</th>
                <th>Tools</th>
                <th>Structured</th>
            </tr>
        </thead>
        <tbody id="tableBody">
            <tr><td colspan="10">Loading...</td></tr>
        </tbody>
    </table>

    <script>
        const snapshot = {data};

        document.getElementById('generated').textContent =
            'generated at ' + snapshot.generated_at +
            ' · ' + snapshot.metadata.total_models + ' models';

        const tbody = document.getElementById('tableBody');
        tbody.innerHTML = '';

        const cell = (value) => {{
            const td = document.createElement('td');
            td.textContent = value;
            return td;
        }};

        snapshot.data.forEach(model => {{
            (model.providers || []).forEach(provider => {{
                const row = document.createElement('tr');
                row.appendChild(cell(model.id));
                row.appendChild(cell(provider.provider));
                row.appendChild(cell(provider.status || '-'));
                row.appendChild(cell(provider.uptime_30d !== undefined ? provider.uptime_30d : '-'));
                row.appendChild(cell(provider.pricing ? provider.pricing.input : '-'));
                row.appendChild(cell(provider.pricing ? provider.pricing.output : '-'));
                row.appendChild(cell(provider.context_length || '-'));
                row.appendChild(cell(provider.quantization || '-'));
                row.appendChild(cell(provider.supports_tools ? 'Yes' : 'No'));
                row.appendChild(cell(provider.supports_structured_output ? 'Yes' : 'No'));
                tbody.appendChild(row);
            }});
        }});
    </script>
</body>
</html>"#
    ))
}
