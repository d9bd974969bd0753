//! Static single-page control UI served at `/`. Talks to the JSON API with
//! `fetch`; the map itself is embedded through the `/api/map` iframe.

use axum::response::Html;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Storymap</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 0; display: grid;
               grid-template-columns: 320px 1fr 300px; height: 100vh; }
        .panel { padding: 12px; overflow-y: auto; border-right: 1px solid #ddd; }
        h2 { font-size: 14px; text-transform: uppercase; color: #555; }
        textarea { width: 100%; height: 180px; box-sizing: border-box; }
        input, select, button { margin: 2px 0; }
        button { cursor: pointer; }
        iframe { width: 100%; height: calc(100% - 60px); border: 1px solid #ddd; }
        #status { color: #a33; font-size: 13px; min-height: 18px; }
        ul { padding-left: 18px; font-size: 13px; }
    </style>
</head>
<body>
    <div class="panel">
        <h2>Text</h2>
        <textarea id="text" placeholder="Paste or type a story..."></textarea>
        <div>
            <button onclick="setText()">Use text</button>
            <button onclick="post('/api/text/clipboard')">From clipboard</button>
            <button onclick="post('/api/text/image')">OCR clipboard image</button>
        </div>
        <div>
            <input id="url" placeholder="https://example.com/article">
            <button onclick="fromUrl()">Scrape URL</button>
        </div>
        <h2>Extract</h2>
        <label><input type="checkbox" id="use_ner" checked> pattern matcher</label><br>
        <label><input type="checkbox" id="use_llm" checked> LLM</label><br>
        <button onclick="extract()">Extract &amp; geocode</button>
        <div id="status"></div>
    </div>
    <div class="panel">
        <h2>Map</h2>
        <button onclick="reloadMap('/api/map')">Leaflet</button>
        <button onclick="reloadMap('/api/map/google')">Google</button>
        <iframe id="map" src="/api/map"></iframe>
    </div>
    <div class="panel">
        <h2>Places</h2>
        <ul id="places"></ul>
        <h2>Annotate</h2>
        <input id="ann_index" type="number" min="0" placeholder="index" style="width:60px">
        <select id="ann_sentiment">
            <option value="">sentiment...</option>
            <option>positive</option><option>neutral</option><option>negative</option>
        </select>
        <input id="ann_notes" placeholder="notes">
        <button onclick="annotate()">Apply</button>
        <h2>Route</h2>
        <input id="route_origin" type="number" min="0" placeholder="from" style="width:50px">
        <input id="route_dest" type="number" min="0" placeholder="to" style="width:50px">
        <input id="route_waypoints" placeholder="via 2,3" style="width:70px">
        <select id="route_mode">
            <option>driving</option><option>walking</option>
            <option>transit</option><option>bicycling</option>
        </select>
        <button onclick="planRoute()">Route</button>
        <div id="route_summary"></div>
        <ol id="route_steps"></ol>
        <h2>Saved maps</h2>
        <input id="map_name" placeholder="map name">
        <button onclick="saveMap()">Save</button>
        <button onclick="loadMap()">Load</button>
        <ul id="maps"></ul>
    </div>
    <script>
        const status = (msg) => document.getElementById("status").textContent = msg || "";
        async function post(path, body) {
            const resp = await fetch(path, {
                method: "POST",
                headers: { "Content-Type": "application/json" },
                body: JSON.stringify(body || {})
            });
            const data = await resp.json();
            status(data.warning);
            await refresh();
            return data;
        }
        const setText = () => post("/api/text", { text: document.getElementById("text").value });
        const fromUrl = () => post("/api/text/url", { url: document.getElementById("url").value });
        const extract = () => post("/api/extract", {
            use_ner: document.getElementById("use_ner").checked,
            use_llm: document.getElementById("use_llm").checked
        });
        const annotate = () => post(`/api/places/${document.getElementById("ann_index").value}/annotate`, {
            sentiment: document.getElementById("ann_sentiment").value || null,
            notes: document.getElementById("ann_notes").value || null
        });
        const planRoute = () => post("/api/route", {
            origin: Number(document.getElementById("route_origin").value),
            destination: Number(document.getElementById("route_dest").value),
            waypoints: document.getElementById("route_waypoints").value
                .split(",").map((s) => s.trim()).filter((s) => s !== "").map(Number),
            mode: document.getElementById("route_mode").value
        });
        const showRoute = (route) => {
            document.getElementById("route_summary").textContent = route
                ? `${route.distance} - ${route.duration} (${route.start_address} to ${route.end_address})`
                : "";
            document.getElementById("route_steps").innerHTML = route
                ? route.steps.map((s) => `<li>${s.instruction} (${s.distance}, ${s.duration})</li>`).join("")
                : "";
        };
        const saveMap = () => post("/api/maps/save", { name: document.getElementById("map_name").value });
        const loadMap = () => post("/api/maps/load", { name: document.getElementById("map_name").value });
        const reloadMap = (src) => document.getElementById("map").src = src + "?t=" + Date.now();
        async function refresh() {
            const places = await (await fetch("/api/places")).json();
            document.getElementById("places").innerHTML = places.geocoded
                .map((p, i) => `<li>[${i}] ${p.name} (${p.sentiment}, x${p.mentions})</li>`)
                .join("");
            showRoute(places.route);
            const maps = await (await fetch("/api/maps")).json();
            document.getElementById("maps").innerHTML = maps.maps
                .map((n) => `<li>${n}</li>`).join("");
            reloadMap("/api/map");
        }
        refresh();
    </script>
</body>
</html>
"#;

pub async fn page() -> Html<&'static str> {
    Html(PAGE)
}
