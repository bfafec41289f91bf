// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Small OSM XML map used by the reader and model tests.
///
///  6 ┄┄┄┄┄┄┄┄ 5
///             │
///             │
///             4         7
///             │
///  1 ──────── 2 ────────────── 3
pub const SIMPLE_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="hand">
  <bounds minlat="0.0" minlon="0.0" maxlat="0.01" maxlon="0.01"/>
  <node id="1" lat="0.0" lon="0.0"/>
  <node id="2" lat="0.0" lon="0.004"/>
  <node id="3" lat="0.0" lon="0.01"/>
  <node id="4" lat="0.003" lon="0.004">
    <tag k="highway" v="crossing"/>
  </node>
  <node id="5" lat="0.01" lon="0.004"/>
  <node id="6" lat="0.01" lon="0.0"/>
  <node id="7" lat="0.005" lon="0.009"/>
  <node id="8" lat="not-a-number" lon="0.009"/>
  <way id="100">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="residential"/>
    <tag k="name" v="First Street"/>
  </way>
  <way id="101">
    <nd ref="2"/>
    <nd ref="4"/>
    <nd ref="5"/>
    <tag k="highway" v="primary"/>
  </way>
  <way id="102">
    <nd ref="5"/>
    <nd ref="6"/>
    <tag k="highway" v="footway"/>
  </way>
  <way id="103">
    <nd ref="7"/>
    <nd ref="3"/>
    <nd ref="42"/>
    <tag k="building" v="yes"/>
  </way>
  <relation id="200">
    <member type="way" ref="100" role="from"/>
    <member type="node" ref="2" role="via"/>
    <member type="way" ref="101" role="to"/>
    <tag k="type" v="restriction"/>
  </relation>
</osm>
"#;
