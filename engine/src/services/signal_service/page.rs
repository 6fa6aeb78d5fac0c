// Handler for GET /: the signal form page
use axum::response::Html;

pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>FX Signal Desk</title>
<style>
  body { background: #050a18; color: #e6eefc; font-family: system-ui, sans-serif; max-width: 880px; margin: 40px auto; padding: 0 16px; }
  .grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px; margin-bottom: 16px; }
  .cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; }
  label { display: grid; gap: 6px; }
  input, select { background: #0b1220; border: 1px solid #1f2a44; border-radius: 8px; padding: 10px 12px; color: #e6eefc; }
  button { padding: 10px 14px; background: #3b82f6; border: 1px solid #1f2a44; border-radius: 8px; color: #fff; font-weight: 600; cursor: pointer; }
  button:disabled { opacity: 0.6; cursor: wait; }
  .panel { margin-top: 16px; padding: 16px; background: #0b1220; border: 1px solid #1f2a44; border-radius: 8px; }
  .label { font-size: 12px; color: #9fb0d3; }
  .value { font-size: 16px; font-weight: 600; }
  .error { margin-top: 16px; color: #ff8a8a; }
  .rationale { margin-top: 12px; white-space: pre-wrap; color: #bcd1ff; }
</style>
</head>
<body>
<h1>FX Signal Desk</h1>
<form id="signal-form">
  <div class="grid">
    <label><span>Pair</span><input id="pair" name="pair" value="EURUSD" placeholder="EURUSD"></label>
    <label><span>Timeframe</span>
      <select id="timeframe" name="timeframe">
        <option>M1</option><option>M5</option><option selected>M15</option><option>M30</option>
        <option>H1</option><option>H4</option><option>D1</option>
      </select>
    </label>
  </div>
  <button id="generate" type="submit">Generate Signal</button>
</form>
<div id="error" class="error" hidden></div>
<div id="result" class="panel" hidden>
  <div class="cards">
    <div><div class="label">Action</div><div class="value" id="action"></div></div>
    <div><div class="label">Entry</div><div class="value" id="entry"></div></div>
    <div><div class="label">Stop Loss</div><div class="value" id="stopLoss"></div></div>
    <div><div class="label">Take Profit</div><div class="value" id="takeProfit"></div></div>
    <div><div class="label">Confidence</div><div class="value" id="confidence"></div></div>
    <div><div class="label">Generated</div><div class="value" id="generatedAt"></div></div>
  </div>
  <div class="rationale" id="rationale"></div>
</div>
<script>
  const form = document.getElementById('signal-form');
  const button = document.getElementById('generate');
  const errorBox = document.getElementById('error');
  const result = document.getElementById('result');
  const num = (n) => (n === null || n === undefined || Number.isNaN(n)) ? '-' : String(n);
  const set = (id, text) => { document.getElementById(id).textContent = text; };

  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    const pair = document.getElementById('pair').value.trim().toUpperCase();
    const timeframe = document.getElementById('timeframe').value;
    button.disabled = true;
    button.textContent = 'Generating...';
    errorBox.hidden = true;
    result.hidden = true;
    try {
      const res = await fetch(`/api/signal?pair=${encodeURIComponent(pair)}&timeframe=${encodeURIComponent(timeframe)}`);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || `Request failed: ${res.status}`);
      }
      const signal = await res.json();
      set('action', signal.action.toUpperCase());
      set('entry', num(signal.entry));
      set('stopLoss', num(signal.stopLoss));
      set('takeProfit', num(signal.takeProfit));
      set('confidence', `${Math.round(signal.confidence * 100)}%`);
      set('generatedAt', new Date(signal.generatedAt).toLocaleString());
      set('rationale', signal.rationale);
      result.hidden = false;
    } catch (e) {
      errorBox.textContent = e.message || 'Failed to generate signal';
      errorBox.hidden = false;
    } finally {
      button.disabled = false;
      button.textContent = 'Generate Signal';
    }
  });
</script>
</body>
</html>
"#;
