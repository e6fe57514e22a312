/// Single-page front end. Controls are built from `/api/layout`; every
/// control change posts `{selection, change}` to `/api/update` and redraws
/// both charts from the returned chart specs with Plotly.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SpaceX Launch Records Dashboard</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <style>
        * { box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }
        h1 { text-align: center; color: #503D36; font-size: 40px; margin-bottom: 20px; }
        .panel {
            background: white;
            padding: 15px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        label { font-weight: 600; display: block; margin-bottom: 5px; color: #555; }
        input[type=text] { width: 100%; padding: 8px; border: 1px solid #ddd; border-radius: 4px; }
        .slider { position: relative; height: 40px; }
        .slider input[type=range] { position: absolute; width: 100%; pointer-events: none; }
        .slider input[type=range]::-webkit-slider-thumb { pointer-events: all; }
        .slider input[type=range]::-moz-range-thumb { pointer-events: all; }
        .marks { display: flex; justify-content: space-between; color: #666; font-size: 12px; }
        .chart { height: 450px; }
        .status { color: #666; font-size: 14px; }
    </style>
</head>
<body>
    <h1 id="heading">SpaceX Launch Records Dashboard</h1>

    <div class="panel">
        <input id="site-dropdown" type="text" list="site-options">
        <datalist id="site-options"></datalist>
    </div>

    <div class="panel"><div id="success-pie-chart" class="chart"></div></div>

    <div class="panel">
        <p>Payload range (Kg):</p>
        <div class="slider">
            <input id="payload-low" type="range">
            <input id="payload-high" type="range">
        </div>
        <div class="marks" id="payload-marks"></div>
        <div class="status" id="payload-value"></div>
    </div>

    <div class="panel"><div id="success-payload-scatter-chart" class="chart"></div></div>

    <div class="status" id="status"></div>

    <script>
        let layout = null;
        let selection = null;
        let siteByLabel = {};

        function setStatus(text) {
            document.getElementById('status').textContent = text;
        }

        function emptyLayout(spec) {
            return {
                title: spec.title,
                xaxis: { visible: false },
                yaxis: { visible: false },
                annotations: [{ text: spec.placeholder, showarrow: false, font: { size: 16 } }]
            };
        }

        function pieFigure(spec) {
            if (spec.placeholder) {
                return { data: [], layout: emptyLayout(spec) };
            }
            return {
                data: [{
                    type: 'pie',
                    labels: spec.sectors.map(s => s.label),
                    values: spec.sectors.map(s => s.value),
                    marker: { colors: spec.sectors.map(s => s.color) },
                    sort: false
                }],
                layout: { title: spec.title }
            };
        }

        function scatterFigure(spec) {
            if (spec.placeholder) {
                return { data: [], layout: emptyLayout(spec) };
            }
            return {
                data: spec.series.map(s => ({
                    type: 'scatter',
                    mode: 'markers',
                    name: s.name,
                    x: s.points.map(p => p.x),
                    y: s.points.map(p => p.y),
                    marker: { color: s.color, size: 10 }
                })),
                layout: {
                    title: spec.title,
                    hovermode: 'closest',
                    xaxis: { title: spec.x_axis.label },
                    yaxis: {
                        title: spec.y_axis.label,
                        tickvals: spec.y_axis.ticks.map(t => t.value),
                        ticktext: spec.y_axis.ticks.map(t => t.text),
                        range: [-0.5, 1.5]
                    },
                    legend: { title: { text: 'Booster Version Category' } }
                }
            };
        }

        function draw(figures) {
            const pie = pieFigure(figures.proportion);
            const scatter = scatterFigure(figures.scatter);
            Plotly.react('success-pie-chart', pie.data, pie.layout, { responsive: true });
            Plotly.react('success-payload-scatter-chart', scatter.data, scatter.layout, { responsive: true });
        }

        function showRange() {
            const r = selection.payload_range;
            document.getElementById('payload-value').textContent = `${r.low} – ${r.high} kg`;
        }

        // Newest request wins; older responses are dropped when they land.
        let requestSeq = 0;

        function applyChange(current, change) {
            const next = {
                site: current.site,
                payload_range: { ...current.payload_range }
            };
            if ('site' in change) { next.site = change.site; }
            if ('payload_range' in change) { next.payload_range = { ...change.payload_range }; }
            return next;
        }

        async function dispatch(change) {
            const previous = selection;
            selection = applyChange(previous, change);
            showRange();
            const seq = ++requestSeq;
            try {
                const response = await fetch('/api/update', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ selection: previous, change })
                });
                const body = await response.json();
                if (seq !== requestSeq) {
                    return;
                }
                if (!response.ok) {
                    setStatus('Error: ' + body.message);
                    return;
                }
                draw(body.figures);
                setStatus('');
            } catch (err) {
                if (seq !== requestSeq) {
                    return;
                }
                console.error('Error:', err);
                setStatus('Error: ' + err);
            }
        }

        function buildControls() {
            document.getElementById('heading').textContent = layout.heading;

            const dropdown = document.getElementById('site-dropdown');
            const options = document.getElementById('site-options');
            dropdown.placeholder = layout.site_dropdown.placeholder;
            options.innerHTML = '';
            for (const opt of layout.site_dropdown.options) {
                siteByLabel[opt.label] = opt.value;
                const el = document.createElement('option');
                el.value = opt.label;
                options.appendChild(el);
            }
            dropdown.value = layout.site_dropdown.options
                .find(o => o.value === selection.site)?.label ?? '';
            dropdown.addEventListener('change', () => {
                const site = siteByLabel[dropdown.value];
                if (site !== undefined && site !== selection.site) {
                    dispatch({ site });
                }
            });

            const slider = layout.payload_slider;
            const low = document.getElementById('payload-low');
            const high = document.getElementById('payload-high');
            for (const input of [low, high]) {
                input.min = slider.min;
                input.max = slider.max;
                input.step = 'any';
            }
            low.value = selection.payload_range.low;
            high.value = selection.payload_range.high;

            // Only the thumb that moved snaps to a step; the other keeps its
            // exact value, which may be the dataset's true min or max.
            const snap = v => Math.round(v / slider.step) * slider.step;
            const onSlide = event => {
                const moved = event.target;
                const current = selection.payload_range;
                let a = current.low;
                let b = current.high;
                if (moved === low) {
                    a = Math.min(snap(Number(low.value)), b);
                    low.value = a;
                } else {
                    b = Math.max(snap(Number(high.value)), a);
                    high.value = b;
                }
                if (a === current.low && b === current.high) {
                    return;
                }
                dispatch({ payload_range: { low: a, high: b } });
            };
            low.addEventListener('change', onSlide);
            high.addEventListener('change', onSlide);

            document.getElementById('payload-marks').innerHTML =
                slider.marks.map(m => `<span>${m}</span>`).join('');
        }

        async function init() {
            try {
                const response = await fetch('/api/layout');
                layout = await response.json();
                selection = layout.initial;
                buildControls();
                showRange();

                const params = new URLSearchParams({
                    site: selection.site,
                    low: selection.payload_range.low,
                    high: selection.payload_range.high
                });
                const figures = await (await fetch('/api/figures?' + params)).json();
                draw(figures);
            } catch (err) {
                console.error('Error:', err);
                setStatus('Error: ' + err);
            }
        }

        init();
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn script_fn(name: &str) -> &'static str {
        let start = INDEX_HTML
            .find(&format!("function {name}("))
            .unwrap_or_else(|| panic!("missing function {name}"));
        let rest = &INDEX_HTML[start..];
        let end = rest.find("\n        }\n").expect("function end");
        &rest[..end]
    }

    #[test]
    fn dispatch_updates_selection_before_posting() {
        let body = script_fn("dispatch");
        let local = body.find("selection = applyChange(").expect("local update");
        let post = body.find("fetch('/api/update'").expect("post");
        assert!(local < post);
        // Server responses never overwrite the page's selection.
        assert!(!body.contains("selection = body.selection"));
    }

    #[test]
    fn stale_responses_are_dropped() {
        let body = script_fn("dispatch");
        let guard = body.find("seq !== requestSeq").expect("sequence guard");
        let draw = body.find("draw(body.figures)").expect("draw");
        assert!(guard < draw);
    }

    #[test]
    fn slider_snaps_only_the_moved_thumb() {
        let start = INDEX_HTML.find("const onSlide").expect("slide handler");
        let handler = &INDEX_HTML[start..start + 800];
        assert!(handler.contains("event.target"));
        assert!(handler.contains("let a = current.low"));
        assert!(handler.contains("let b = current.high"));
        assert!(!handler.contains("snap(Number(low.value));\n                let b = snap"));
    }
}
