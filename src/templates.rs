use crate::ConversionOutcome;

fn format_duration(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{}m {:02}s", minutes, seconds)
    }
}

pub fn render_landing_page() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Zwo2Fit</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; padding: 0; background: #f7f7f7; }
    header { background: #20232a; color: white; padding: 1rem 2rem; }
    main { padding: 2rem; max-width: 960px; margin: 0 auto; }
    .drop-zone { border: 2px dashed #888; padding: 2rem; background: white; text-align: center; }
    .drop-zone.drag { border-color: #2563eb; background: #eff6ff; }
    .status { margin-top: 1rem; }
    label { display: block; margin: 1rem 0 0.25rem; }
    input[type=number] { padding: 0.5rem; width: 8rem; }
    button { background: #2563eb; color: white; border: none; padding: 0.75rem 1.5rem; border-radius: 4px; cursor: pointer; }
    button:hover { background: #1d4ed8; }
  </style>
</head>
<body>
  <header><h1>Zwo2Fit</h1></header>
  <main>
    <p>Upload a Zwift workout (.zwo) to convert it into a device-ready FIT workout file.</p>
    <div id="drop-zone" class="drop-zone">
      <p>Drag &amp; drop your ZWO file here, or click to select.</p>
      <input id="file-input" type="file" accept=".zwo,.xml" style="display:none" />
      <button id="select-btn" type="button">Choose a file</button>
    </div>
    <label for="ftp-input">Your FTP (watts)</label>
    <input id="ftp-input" type="number" value="250" min="1" />
    <p class="status" id="status"></p>
    <div id="result"></div>
  </main>
  <script>
    const dropZone = document.getElementById('drop-zone');
    const fileInput = document.getElementById('file-input');
    const selectBtn = document.getElementById('select-btn');
    const ftpInput = document.getElementById('ftp-input');
    const statusEl = document.getElementById('status');
    const resultEl = document.getElementById('result');

    const preventDefaults = (e) => { e.preventDefault(); e.stopPropagation(); };
    ['dragenter', 'dragover', 'dragleave', 'drop'].forEach(eventName => {
      dropZone.addEventListener(eventName, preventDefaults, false);
      document.body.addEventListener(eventName, preventDefaults, false);
    });

    ['dragenter', 'dragover'].forEach(eventName => {
      dropZone.addEventListener(eventName, () => dropZone.classList.add('drag'), false);
    });
    ['dragleave', 'drop'].forEach(eventName => {
      dropZone.addEventListener(eventName, () => dropZone.classList.remove('drag'), false);
    });

    dropZone.addEventListener('click', () => fileInput.click());
    selectBtn.addEventListener('click', () => fileInput.click());

    dropZone.addEventListener('drop', handleFiles);
    fileInput.addEventListener('change', (e) => handleFiles({ dataTransfer: { files: e.target.files } }));

    async function handleFiles(e) {
      const files = e.dataTransfer.files;
      if (!files || files.length === 0) {
        return;
      }
      const formData = new FormData();
      formData.append('file', files[0]);
      formData.append('ftp', ftpInput.value);
      statusEl.textContent = 'Converting...';
      try {
        const response = await fetch('/convert', { method: 'POST', body: formData });
        const message = await response.text();
        if (response.ok) {
          statusEl.textContent = '';
          resultEl.innerHTML = message;
        } else {
          statusEl.textContent = 'Conversion failed: ' + message;
        }
      } catch (err) {
        statusEl.textContent = 'Conversion failed: ' + err;
      }
    }
  </script>
</body>
</html>"#
}

pub fn render_conversion_result(outcome: &ConversionOutcome, download_url: &str) -> String {
    let mut body = String::new();

    body.push_str("<section class=\"results-card\">");
    body.push_str(
        "<div class=\"results-header\"><div><p class=\"eyebrow\">Workout Converted</p><h2>Ready for your head unit</h2></div>",
    );
    body.push_str(&format!(
        "<a class=\"cta\" download href={download_url}>Download FIT file</a>"
    ));
    body.push_str("</div>");

    body.push_str("<div class=\"summary-grid\">");
    body.push_str(&format!(
        "<div class=\"summary-card\"><p class=\"label\">Workout Name</p><p class=\"value\">{}</p></div>",
        outcome.workout_name
    ));
    body.push_str(&format!(
        "<div class=\"summary-card\"><p class=\"label\">Total Duration</p><p class=\"value\">{}</p></div>",
        format_duration(outcome.total_duration_seconds)
    ));
    body.push_str(&format!(
        "<div class=\"summary-card\"><p class=\"label\">Steps</p><p class=\"value\">{}</p></div>",
        outcome.step_count
    ));
    body.push_str(&format!(
        "<div class=\"summary-card\"><p class=\"label\">FTP</p><p class=\"value\">{} W</p></div>",
        outcome.ftp_watts
    ));
    body.push_str(&format!(
        "<div class=\"summary-card\"><p class=\"label\">File Size</p><p class=\"value\">{} bytes</p></div>",
        outcome.file_size
    ));
    body.push_str(&format!(
        "<div class=\"summary-card\"><p class=\"label\">Checksum</p><p class=\"value\">{:04X}</p></div>",
        outcome.checksum
    ));
    body.push_str("</div>");

    if !outcome.description.is_empty() {
        body.push_str(&format!(
            "<p class=\"description\">{}</p>",
            outcome.description
        ));
    }
    body.push_str("</section>");

    body.push_str("<section class=\"results-card\">");
    body.push_str(&format!(
        "<div class=\"results-header\"><div><p class=\"eyebrow\">Encoded messages</p><h2>{} records decoded back from the file</h2></div></div>",
        outcome.records.len()
    ));
    body.push_str("<div class=\"table-wrapper\"><table><thead><tr><th>Message</th><th>Fields</th></tr></thead><tbody>");

    for record in &outcome.records {
        body.push_str(&format!("<tr><td>{}</td><td>", record.message_type));
        body.push_str("<ul>");
        for field in &record.fields {
            body.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>",
                field.name, field.value
            ));
        }
        body.push_str("</ul></td></tr>");
    }

    body.push_str("</tbody></table></div>");
    body.push_str("</section>");
    body
}
