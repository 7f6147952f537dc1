pub mod workflow_xml;
