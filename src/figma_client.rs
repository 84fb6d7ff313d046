//! Figma REST API client.
//!
//! The extraction engine only sees the [`SourceApi`] trait; the concrete
//! [`FigmaApiClient`] wraps `https://api.figma.com/v1` for one file and
//! maps transport and payload failures to [`FigmageError`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::batch::run_batched;
use crate::error::{FigmageError, Result};
use crate::types::{ImageFormat, NodeRecord, StyleRecord};

/// Ids per `/nodes` call; larger lists are split to keep URLs short.
const NODE_IDS_PER_REQUEST: usize = 50;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote document-graph operations the extraction engine needs.
#[async_trait]
pub trait SourceApi: Send + Sync {
    /// All published style records of the file.
    async fn fetch_styles(&self) -> Result<Vec<StyleRecord>>;

    /// Batched node lookup, keyed by the requested ids.
    async fn fetch_nodes(&self, ids: &[String]) -> Result<HashMap<String, NodeRecord>>;

    /// Flattened `COMPONENT` descendants of the given node.
    async fn fetch_node_children(&self, id: &str) -> Result<Vec<NodeRecord>>;

    /// Rendered image URLs for the given node ids.
    async fn fetch_images(
        &self,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<HashMap<String, String>>;

    /// Top-level frame name → node id, one level below each page.
    async fn fetch_frame_ids_by_name(&self) -> Result<HashMap<String, String>>;

    /// Body of a rendered image URL (SVG markup).
    async fn fetch_image_contents(&self, url: &str) -> Result<String>;

    /// Newest file version labelled "Components Published", if any.
    async fn fetch_latest_version(&self) -> Result<Option<String>>;

    /// Download a rendered asset to disk.
    async fn download_file(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Deserialize)]
pub struct FigmaStylesResponse {
    pub meta: FigmaStylesMeta,
}

#[derive(Debug, Deserialize)]
pub struct FigmaStylesMeta {
    pub styles: Vec<StyleRecord>,
}

#[derive(Debug, Deserialize)]
pub struct FigmaNodesResponse {
    pub nodes: HashMap<String, FigmaNodeWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct FigmaNodeWrapper {
    pub document: NodeRecord,
}

#[derive(Debug, Deserialize)]
pub struct FigmaImagesResponse {
    /// URLs may be null when rendering a node failed remotely.
    pub images: HashMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct FigmaFileResponse {
    pub document: NodeRecord,
}

#[derive(Debug, Deserialize)]
pub struct FigmaVersionsResponse {
    pub versions: Vec<FigmaVersion>,
}

#[derive(Debug, Deserialize)]
pub struct FigmaVersion {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

pub struct FigmaApiClient {
    /// Authenticated client for api.figma.com.
    api: reqwest::Client,
    /// Plain client for rendered-image URLs; the token header must not
    /// leak to the CDN.
    downloader: reqwest::Client,
    base_url: Url,
    file_id: String,
    batch_size: usize,
}

impl FigmaApiClient {
    pub fn new(access_token: &str, file_id: impl Into<String>) -> Result<Self> {
        Self::with_timeout(access_token, file_id, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        access_token: &str,
        file_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(access_token)
            .map_err(|_| FigmageError::config("access token contains invalid characters"))?;
        token.set_sensitive(true);
        headers.insert("X-Figma-Token", token);

        let api = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        let downloader = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api,
            downloader,
            base_url: Url::parse("https://api.figma.com/v1/")?,
            file_id: file_id.into(),
            batch_size: 40,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Test seam: point the client at a stub server.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self.api.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FigmageError::source_api(Some(status), message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            FigmageError::source_api(Some(status), format!("malformed response: {e}"))
        })
    }

    async fn fetch_node_batch(&self, ids: &[String]) -> Result<HashMap<String, NodeRecord>> {
        let response: FigmaNodesResponse = self
            .get_json(
                &format!("files/{}/nodes", self.file_id),
                &[("ids", ids.join(","))],
            )
            .await?;

        Ok(response
            .nodes
            .into_iter()
            .map(|(id, wrapper)| (id, wrapper.document))
            .collect())
    }
}

/// Split an id list into request-sized chunks, preserving order.
fn chunk_node_ids(ids: &[String]) -> Vec<Vec<String>> {
    ids.chunks(NODE_IDS_PER_REQUEST)
        .map(|chunk| chunk.to_vec())
        .collect()
}

fn flatten_components(node: NodeRecord, out: &mut Vec<NodeRecord>) {
    let children = node.children.clone();
    if node.node_type == "COMPONENT" {
        out.push(node);
    }
    for child in children {
        flatten_components(child, out);
    }
}

#[async_trait]
impl SourceApi for FigmaApiClient {
    async fn fetch_styles(&self) -> Result<Vec<StyleRecord>> {
        let response: FigmaStylesResponse = self
            .get_json(&format!("files/{}/styles", self.file_id), &[])
            .await?;
        Ok(response.meta.styles)
    }

    async fn fetch_nodes(&self, ids: &[String]) -> Result<HashMap<String, NodeRecord>> {
        let batches = run_batched(chunk_node_ids(ids), self.batch_size, |chunk| async move {
            self.fetch_node_batch(&chunk).await
        })
        .await?;

        Ok(batches.into_iter().flatten().collect())
    }

    async fn fetch_node_children(&self, id: &str) -> Result<Vec<NodeRecord>> {
        let mut nodes = self.fetch_node_batch(&[id.to_string()]).await?;
        let document = nodes.remove(id).ok_or_else(|| {
            FigmageError::source_api(None, format!("node {id} missing from response"))
        })?;

        let mut components = Vec::new();
        flatten_components(document, &mut components);
        Ok(components)
    }

    async fn fetch_images(
        &self,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<HashMap<String, String>> {
        let response: FigmaImagesResponse = self
            .get_json(
                &format!("images/{}", self.file_id),
                &[
                    ("ids", ids.join(",")),
                    ("format", format.as_str().to_string()),
                ],
            )
            .await?;

        // Nodes the renderer could not process come back as null.
        Ok(response
            .images
            .into_iter()
            .filter_map(|(id, url)| url.map(|url| (id, url)))
            .collect())
    }

    async fn fetch_frame_ids_by_name(&self) -> Result<HashMap<String, String>> {
        let response: FigmaFileResponse = self
            .get_json(
                &format!("files/{}", self.file_id),
                &[("depth", "2".to_string())],
            )
            .await?;

        let mut frames = HashMap::new();
        for page in response.document.children {
            for frame in page.children {
                frames.insert(frame.name, frame.id);
            }
        }
        Ok(frames)
    }

    async fn fetch_image_contents(&self, url: &str) -> Result<String> {
        let response = self.downloader.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FigmageError::source_api(
                Some(status),
                format!("image fetch failed for {url}"),
            ));
        }
        Ok(response.text().await?)
    }

    async fn fetch_latest_version(&self) -> Result<Option<String>> {
        let response: FigmaVersionsResponse = self
            .get_json(&format!("files/{}/versions", self.file_id), &[])
            .await?;

        Ok(response
            .versions
            .into_iter()
            .find(|v| v.label.as_deref() == Some("Components Published"))
            .map(|v| v.id))
    }

    async fn download_file(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.downloader.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FigmageError::source_api(
                Some(status),
                format!("download failed for {url}"),
            ));
        }
        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, node_type: &str, children: Vec<NodeRecord>) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            name: name.to_string(),
            node_type: node_type.to_string(),
            children,
            ..Default::default()
        }
    }

    #[test]
    fn large_id_lists_split_into_request_sized_chunks() {
        let ids: Vec<String> = (0..120).map(|i| format!("1:{i}")).collect();
        let chunks = chunk_node_ids(&ids);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), NODE_IDS_PER_REQUEST);
        assert_eq!(chunks[1].len(), NODE_IDS_PER_REQUEST);
        assert_eq!(chunks[2].len(), 20);

        // Recombining the chunks restores the requested order exactly.
        let recombined: Vec<String> = chunks.into_iter().flatten().collect();
        assert_eq!(recombined, ids);
    }

    #[test]
    fn short_id_lists_stay_in_a_single_chunk() {
        let ids: Vec<String> = (0..NODE_IDS_PER_REQUEST).map(|i| format!("1:{i}")).collect();
        let chunks = chunk_node_ids(&ids);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], ids);
    }

    #[test]
    fn flatten_keeps_only_components_in_document_order() {
        let tree = node(
            "1:0",
            "Icons",
            "FRAME",
            vec![
                node("1:1", "Check", "COMPONENT", vec![]),
                node(
                    "1:2",
                    "Nested",
                    "GROUP",
                    vec![node("1:3", "Close", "COMPONENT", vec![])],
                ),
                node("1:4", "Note", "TEXT", vec![]),
            ],
        );

        let mut out = Vec::new();
        flatten_components(tree, &mut out);

        let names: Vec<&str> = out.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Check", "Close"]);
    }

    #[test]
    fn flatten_includes_the_root_when_it_is_a_component() {
        let tree = node(
            "2:0",
            "Logo",
            "COMPONENT",
            vec![node("2:1", "Mark", "COMPONENT", vec![])],
        );

        let mut out = Vec::new();
        flatten_components(tree, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Logo");
    }
}
