//! Upload form page
//!
//! A single embedded page drives the whole interaction: pick PDFs,
//! submit the batch, watch progress, download the archive.

use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Polizas</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 3rem auto; padding: 0 1rem; color: #222; }
    h1 { font-size: 1.4rem; }
    form { margin: 1.5rem 0; display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
    button { padding: 0.4rem 1.2rem; }
    progress { width: 100%; height: 1rem; }
    #status { min-height: 1.5rem; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Renombrador de pólizas</h1>
  <p>Suba sus archivos PDF. Cada uno será renombrado con el número de
  póliza encontrado en su texto y devuelto dentro de un archivo ZIP.</p>

  <form id="upload-form">
    <input id="file-input" type="file" accept="application/pdf" multiple>
    <button type="submit">Procesar</button>
  </form>

  <progress id="progress" value="0" max="1" hidden></progress>
  <p id="status"></p>

  <script>
    const form = document.getElementById('upload-form');
    const input = document.getElementById('file-input');
    const bar = document.getElementById('progress');
    const status = document.getElementById('status');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      status.className = '';
      if (input.files.length === 0) {
        status.textContent = 'Seleccione al menos un archivo PDF.';
        return;
      }

      const data = new FormData();
      for (const file of input.files) {
        data.append('files', file);
      }

      bar.hidden = false;
      bar.value = 0;
      status.textContent = 'Procesando...';

      const response = await fetch('/api/v1/batches', { method: 'POST', body: data });
      const body = await response.json();
      if (!response.ok) {
        bar.hidden = true;
        status.className = 'error';
        status.textContent = body.error || 'No se pudo iniciar el proceso.';
        return;
      }

      await poll(body.batchId);
    });

    async function poll(batchId) {
      const response = await fetch('/api/v1/batches/' + batchId);
      const body = await response.json();
      if (!response.ok) {
        status.className = 'error';
        status.textContent = body.error || 'Se perdió la sesión del lote.';
        return;
      }

      bar.value = body.progress;

      if (body.status === 'complete') {
        status.textContent = 'Listo: ' + body.totalFiles + ' archivo(s) procesado(s).';
        window.location = '/api/v1/batches/' + batchId + '/archive';
      } else if (body.status === 'failed') {
        bar.hidden = true;
        status.className = 'error';
        status.textContent = body.error || 'El proceso falló.';
      } else {
        setTimeout(() => poll(batchId), 300);
      }
    }
  </script>
</body>
</html>
"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
